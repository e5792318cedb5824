//! End-of-day price history.

use super::base::{BulkSummary, Source};
use crate::error::Result;
use crate::table::{coerce, parse_delimited, CoercionRules, KeyValue};
use polars::prelude::DataFrame;
use std::path::PathBuf;

/// Sub-directory of the price files below the storage root.
pub const PRICES_DIR: &str = "eod_prices";

const RULES: CoercionRules = CoercionRules::new(&["date"], &["symbol"]);

/// Daily OHLCV history, one file per symbol.
#[derive(Clone)]
pub struct EodPrices {
    source: Source,
}

impl EodPrices {
    pub fn new(source: Source) -> Self {
        Self { source }
    }

    /// Fetch and parse the full history of `symbol` without writing it.
    pub fn prices(&self, symbol: &str) -> Result<DataFrame> {
        let body = self.source.fetch_text(&format!("eod/{symbol}"), &[])?;
        let table = parse_delimited(&body, Some(&KeyValue::new("symbol", symbol)))?;
        coerce(table, &RULES)
    }

    /// Write `eod_prices/<symbol>.parq`.
    pub fn eod_prices(&self, symbol: &str) -> Result<PathBuf> {
        let mut table = self.prices(symbol)?;
        self.source.write(symbol, &mut table, Some(PRICES_DIR))
    }

    pub fn eod_prices_exchange(&self, exchange: &str) -> Result<BulkSummary> {
        self.source
            .bulk(exchange, |symbol| self.eod_prices(symbol).map(|_| ()))
    }
}
