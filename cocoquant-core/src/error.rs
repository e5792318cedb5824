//! Structured error types for the EOD client.
//!
//! Designed to be displayable from the CLI and to let the bulk dispatcher
//! decide which failures it may skip.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised while fetching, reshaping or persisting vendor data.
#[derive(Debug, Error)]
pub enum EodError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} for {path}")]
    Status { status: u16, path: String },

    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed response: {0}")]
    MalformedBody(String),

    #[error("malformed CSV payload: {0}")]
    Csv(#[from] csv::Error),

    #[error("table error: {0}")]
    Table(#[from] PolarsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl EodError {
    /// Whether a bulk run may log this error and move on to the next symbol.
    ///
    /// Transport failures and unreadable payloads are per-symbol problems.
    /// Filesystem and table-construction failures are not, and abort the batch.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EodError::Http(_)
                | EodError::Status { .. }
                | EodError::Json(_)
                | EodError::MalformedBody(_)
                | EodError::Csv(_)
        )
    }
}

pub type Result<T, E = EodError> = std::result::Result<T, E>;
