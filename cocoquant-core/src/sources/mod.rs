//! Per-category data sources.
//!
//! Each category composes the shared [`Source`] (fetch, parse, write, bulk)
//! with its own endpoints and reshaping.

pub mod base;
pub mod economic_events;
pub mod fundamentals;
pub mod macro_indicators;
pub mod news;
pub mod prices;
pub mod sentiments;

pub use base::{BulkSummary, Source, WriteReport};
pub use economic_events::EconomicEvents;
pub use fundamentals::{Extractor, Fundamentals, FundamentalsKind, FundamentalsReport};
pub use macro_indicators::{MacroIndicators, INDICATORS};
pub use news::FinancialNews;
pub use prices::EodPrices;
pub use sentiments::{parse_sentiments, Sentiments};
