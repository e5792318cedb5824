//! cocoquant core: a client for the EOD Historical Data REST API.
//!
//! Fetches prices, fundamentals, sentiment, macro indicators, economic events
//! and news, reshapes each payload into a table and stores it as Parquet:
//! - HTTP fetcher behind the [`client::Fetcher`] trait
//! - CSV/JSON parsing, column coercion and Parquet writing in [`table`]
//! - One source per data category in [`sources`], plus the exchange-wide bulk
//!   dispatcher
//! - The [`EodDataDownloader`] facade

pub mod client;
pub mod config;
pub mod downloader;
pub mod error;
pub mod progress;
pub mod sources;
pub mod table;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::{EodClient, Fetcher};
pub use config::{ClientConfig, EOD_HISTORICAL_DATA_URL};
pub use downloader::{EodDataApi, EodDataDownloader};
pub use error::{EodError, Result};
pub use progress::{BulkProgress, LogProgress, StdoutProgress};
pub use sources::{BulkSummary, FundamentalsKind, FundamentalsReport, WriteReport};
