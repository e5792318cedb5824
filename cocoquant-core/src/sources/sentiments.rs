//! News sentiment scores per symbol.

use super::base::{BulkSummary, Source};
use crate::error::{EodError, Result};
use crate::table::{coerce_dates, rows_to_frame};
use polars::prelude::DataFrame;
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::warn;

/// Member of each article holding its sentiment scores.
pub const SENTIMENT_KEY: &str = "sentiment";

/// Flatten a `news` payload: one row per article, with the members of its
/// `sentiment` object moved to the end of the row and `date` parsed.
///
/// Returns `None` for an empty article list.
pub fn parse_sentiments(payload: &Value) -> Result<Option<DataFrame>> {
    let Value::Array(articles) = payload else {
        return Err(EodError::MalformedBody(format!(
            "expected a list of articles, got {}",
            crate::table::parse::json_kind(payload)
        )));
    };
    if articles.is_empty() {
        return Ok(None);
    }

    let rows: Vec<Map<String, Value>> = articles.iter().map(flatten_article).collect();
    let table = rows_to_frame(&rows)?;
    coerce_dates(table, &["date"]).map(Some)
}

fn flatten_article(article: &Value) -> Map<String, Value> {
    let Value::Object(article) = article else {
        let mut row = Map::new();
        row.insert("value".to_string(), article.clone());
        return row;
    };

    let mut row = article.clone();
    if let Some(Value::Object(scores)) = row.shift_remove(SENTIMENT_KEY) {
        for (key, value) in scores {
            row.insert(key, value);
        }
    }
    row
}

/// Sentiment tables, one file per symbol.
#[derive(Clone)]
pub struct Sentiments {
    source: Source,
}

impl Sentiments {
    pub fn new(source: Source) -> Self {
        Self { source }
    }

    /// Write `<symbol>.parq`. An empty article list writes nothing.
    pub fn sentiments(&self, symbol: &str) -> Result<Option<PathBuf>> {
        write_articles(&self.source, symbol)
    }

    pub fn sentiments_exchange(&self, exchange: &str) -> Result<BulkSummary> {
        self.source
            .bulk(exchange, |symbol| self.sentiments(symbol).map(|_| ()))
    }
}

/// Fetch `news?s=<symbol>`, flatten it and write `<symbol>.parq` under the
/// source root.
pub(crate) fn write_articles(source: &Source, symbol: &str) -> Result<Option<PathBuf>> {
    let payload = source.fetch_json("news", &[("s", symbol)])?;
    match parse_sentiments(&payload)? {
        Some(mut table) => source.write(symbol, &mut table, None).map(Some),
        None => {
            warn!(symbol, "no articles");
            Ok(None)
        }
    }
}
