//! Economic calendar events.

use super::base::Source;
use crate::error::{EodError, Result};
use crate::table::{coerce_dates, parse_records};
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::warn;

/// File name of the events table below the category root.
pub const EVENTS_NAME: &str = "economic_events";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone)]
pub struct EconomicEvents {
    source: Source,
}

impl EconomicEvents {
    pub fn new(source: Source) -> Self {
        Self { source }
    }

    /// Fetch events between `from` and `to` (inclusive) and overwrite
    /// `economic_events.parq`. An empty window writes nothing.
    pub fn economic_events(&self, from: NaiveDate, to: NaiveDate) -> Result<Option<PathBuf>> {
        if from > to {
            return Err(EodError::Config(format!(
                "event window starts after it ends: {from} > {to}"
            )));
        }

        let from = from.format(DATE_FORMAT).to_string();
        let to = to.format(DATE_FORMAT).to_string();
        let payload = self
            .source
            .fetch_json("economic-events", &[("from", from.as_str()), ("to", to.as_str())])?;

        match parse_records(&payload)? {
            Some(table) => {
                let mut table = coerce_dates(table, &["date"])?;
                self.source.write(EVENTS_NAME, &mut table, None).map(Some)
            }
            None => {
                warn!(%from, %to, "no economic events");
                Ok(None)
            }
        }
    }
}
