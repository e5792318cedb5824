//! Tabular plumbing: parse vendor payloads, coerce columns, write Parquet.

pub mod coerce;
pub mod parse;
pub mod writer;

pub use coerce::{coerce, coerce_dates, CoercionRules, ColumnKind};
pub use parse::{parse_delimited, parse_nested, parse_records, rows_to_frame, KeyValue};
pub use writer::{read_table, TableWriter, EXTENSION};
