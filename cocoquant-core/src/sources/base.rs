//! Shared fetch / parse / write primitives and the bulk dispatcher.
//!
//! Every category source owns one [`Source`] rooted at its own storage
//! directory. Categories differ only in which endpoints they call and how they
//! reshape the payload.

use crate::client::Fetcher;
use crate::error::{EodError, Result};
use crate::progress::{BulkProgress, LogProgress};
use crate::table::{parse_delimited, TableWriter};
use polars::prelude::DataFrame;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, warn};

/// Fetcher, writer and progress reporter for one category.
#[derive(Clone)]
pub struct Source {
    fetcher: Arc<dyn Fetcher>,
    writer: TableWriter,
    progress: Arc<dyn BulkProgress>,
}

impl Source {
    pub fn new(fetcher: Arc<dyn Fetcher>, root: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            writer: TableWriter::new(root),
            progress: Arc::new(LogProgress),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn BulkProgress>) -> Self {
        self.progress = progress;
        self
    }

    /// Storage root of this category.
    pub fn root(&self) -> &Path {
        self.writer.root()
    }

    /// A source for a sub-directory of this one, sharing fetcher and progress.
    pub fn child(&self, dir: &str) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            writer: TableWriter::new(self.root().join(dir)),
            progress: Arc::clone(&self.progress),
        }
    }

    pub fn fetch_text(&self, path: &str, params: &[(&str, &str)]) -> Result<String> {
        self.fetcher.fetch(path, params)
    }

    pub fn fetch_json(&self, path: &str, params: &[(&str, &str)]) -> Result<Value> {
        let body = self.fetch_text(path, params)?;
        Ok(serde_json::from_str(&body)?)
    }

    pub fn write(&self, name: &str, table: &mut DataFrame, sub_path: Option<&str>) -> Result<PathBuf> {
        self.writer.write(name, table, sub_path)
    }

    /// Latest end-of-day row for every symbol currently priced on `exchange`.
    pub fn latest_prices(&self, exchange: &str) -> Result<DataFrame> {
        let body = self.fetch_text(&format!("eod-bulk-last-day/{exchange}"), &[])?;
        parse_delimited(&body, None)
    }

    /// `<code>.<ex>` for every row of the exchange's bulk listing.
    ///
    /// Rows without a code are skipped; rows without an exchange suffix fall
    /// back to `exchange`.
    pub fn exchange_symbols(&self, exchange: &str) -> Result<Vec<String>> {
        let listing = self.latest_prices(exchange)?;
        let column = |name: &str| {
            listing.column(name).map_err(|_| {
                EodError::MalformedBody(format!(
                    "bulk listing for {exchange} has no '{name}' column"
                ))
            })
        };
        let codes = column("code")?.str()?;
        let suffixes = column("ex")?.str()?;

        let mut symbols = Vec::with_capacity(listing.height());
        for (code, ex) in codes.into_iter().zip(suffixes.into_iter()) {
            match code {
                Some(code) => symbols.push(format!("{code}.{}", ex.unwrap_or(exchange))),
                None => warn!(exchange, "bulk listing row without a code"),
            }
        }
        Ok(symbols)
    }

    /// Run `per_symbol` for every symbol listed on `exchange`, one at a time.
    ///
    /// Recoverable failures (see [`EodError::is_recoverable`]) are logged,
    /// recorded in the summary and skipped. Anything else aborts the batch.
    pub fn bulk<F>(&self, exchange: &str, mut per_symbol: F) -> Result<BulkSummary>
    where
        F: FnMut(&str) -> Result<()>,
    {
        let symbols = self.exchange_symbols(exchange)?;
        let total = symbols.len();
        let mut summary = BulkSummary {
            exchange: exchange.to_string(),
            total,
            succeeded: 0,
            failed: 0,
            errors: Vec::new(),
        };

        for (i, symbol) in symbols.iter().enumerate() {
            self.progress.on_start(symbol, i, total);
            let result = per_symbol(symbol.as_str());
            self.progress.on_complete(symbol, i, total, &result);

            match result {
                Ok(()) => summary.succeeded += 1,
                Err(e) if e.is_recoverable() => {
                    error!(symbol = %symbol, "skipping symbol: {e}");
                    summary.failed += 1;
                    summary.errors.push((symbol.clone(), e));
                }
                Err(e) => return Err(e),
            }
        }

        self.progress
            .on_batch_complete(exchange, summary.succeeded, summary.failed, total);
        Ok(summary)
    }
}

/// Summary of a bulk run over one exchange.
#[derive(Debug)]
pub struct BulkSummary {
    pub exchange: String,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<(String, EodError)>,
}

impl BulkSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Tables written and sub-paths skipped by a multi-table run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WriteReport {
    pub subject: String,
    pub written: Vec<PathBuf>,
    pub skipped: Vec<String>,
}

impl WriteReport {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            ..Self::default()
        }
    }

    /// Record a table that had no data in the payload.
    pub fn skip(&mut self, sub_path: impl Into<String>) {
        let sub_path = sub_path.into();
        warn!(subject = %self.subject, "no {sub_path} data");
        self.skipped.push(sub_path);
    }
}
