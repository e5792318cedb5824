//! Financial news articles per symbol.
//!
//! Same endpoint and flattening as [`super::sentiments`], stored under its own
//! root so the two categories can be refreshed independently.

use super::base::{BulkSummary, Source};
use super::sentiments::write_articles;
use crate::error::Result;
use std::path::PathBuf;

#[derive(Clone)]
pub struct FinancialNews {
    source: Source,
}

impl FinancialNews {
    pub fn new(source: Source) -> Self {
        Self { source }
    }

    pub fn financial_news(&self, symbol: &str) -> Result<Option<PathBuf>> {
        write_articles(&self.source, symbol)
    }

    pub fn financial_news_exchange(&self, exchange: &str) -> Result<BulkSummary> {
        self.source
            .bulk(exchange, |symbol| self.financial_news(symbol).map(|_| ()))
    }
}
