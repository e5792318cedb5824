//! Progress reporting for exchange-wide bulk runs.

use crate::error::EodError;
use tracing::info;

/// Progress callback for multi-symbol operations.
pub trait BulkProgress: Send + Sync {
    /// Called before a symbol is processed.
    fn on_start(&self, symbol: &str, index: usize, total: usize);

    /// Called when a symbol completes, successfully or not.
    fn on_complete(&self, symbol: &str, index: usize, total: usize, result: &Result<(), EodError>);

    /// Called once the whole exchange has been walked.
    fn on_batch_complete(&self, exchange: &str, succeeded: usize, failed: usize, total: usize);
}

/// Reports through `tracing`. The default for library use.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl BulkProgress for LogProgress {
    fn on_start(&self, _symbol: &str, _index: usize, _total: usize) {}

    fn on_complete(&self, symbol: &str, index: usize, total: usize, result: &Result<(), EodError>) {
        info!(symbol, ok = result.is_ok(), "[{}/{}]", index + 1, total);
    }

    fn on_batch_complete(&self, exchange: &str, succeeded: usize, failed: usize, total: usize) {
        info!(exchange, succeeded, failed, total, "bulk run complete");
    }
}

/// Simple progress reporter that prints to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutProgress;

impl BulkProgress for StdoutProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        println!("[{}/{}] Fetching {symbol}...", index + 1, total);
    }

    fn on_complete(
        &self,
        symbol: &str,
        _index: usize,
        _total: usize,
        result: &Result<(), EodError>,
    ) {
        match result {
            Ok(()) => println!("  OK: {symbol}"),
            Err(e) => println!("  FAIL: {symbol}: {e}"),
        }
    }

    fn on_batch_complete(&self, exchange: &str, succeeded: usize, failed: usize, total: usize) {
        println!("\n{exchange}: {succeeded}/{total} succeeded, {failed} failed");
    }
}
