//! Numeric and date coercion of parsed tables.
//!
//! A [`CoercionRules`] names the date columns and the columns to leave alone;
//! every other column is converted to `f64`. Text that does not parse becomes
//! null rather than failing the whole table.

use crate::error::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;

/// How [`coerce`] treats a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Date,
    Numeric,
    Untouched,
}

/// Per-table coercion rules. Unlisted columns are numeric.
#[derive(Debug, Clone, Copy)]
pub struct CoercionRules {
    dates: &'static [&'static str],
    untouched: &'static [&'static str],
}

impl CoercionRules {
    pub const fn new(dates: &'static [&'static str], untouched: &'static [&'static str]) -> Self {
        Self { dates, untouched }
    }

    pub fn kind(&self, column: &str) -> ColumnKind {
        if self.dates.contains(&column) {
            ColumnKind::Date
        } else if self.untouched.contains(&column) {
            ColumnKind::Untouched
        } else {
            ColumnKind::Numeric
        }
    }
}

/// Apply `rules` to every column of `df`.
pub fn coerce(mut df: DataFrame, rules: &CoercionRules) -> Result<DataFrame> {
    for name in column_names(&df) {
        let converted = {
            let column = df.column(&name)?;
            match rules.kind(&name) {
                ColumnKind::Date => to_date(column)?,
                ColumnKind::Numeric => to_numeric(column)?,
                ColumnKind::Untouched => continue,
            }
        };
        df.with_column(converted)?;
    }
    Ok(df)
}

/// Coerce only the listed date columns, where present.
pub fn coerce_dates(mut df: DataFrame, columns: &[&str]) -> Result<DataFrame> {
    for name in column_names(&df) {
        if !columns.contains(&name.as_str()) {
            continue;
        }
        let converted = to_date(df.column(&name)?)?;
        df.with_column(converted)?;
    }
    Ok(df)
}

/// Convert a column to `f64`. Unparseable text becomes null.
pub fn to_numeric(column: &Column) -> Result<Column> {
    match column.dtype() {
        DataType::String => {
            let values: Vec<Option<f64>> = column
                .str()?
                .into_iter()
                .map(|v| v.and_then(parse_number))
                .collect();
            Ok(Column::new(column.name().clone(), values))
        }
        DataType::Boolean
        | DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Float32 => Ok(column.cast(&DataType::Float64)?),
        _ => Ok(column.clone()),
    }
}

/// Convert a text column to `Date`, or to millisecond `Datetime` when any
/// value carries a time of day. Non-text columns are returned unchanged.
pub fn to_date(column: &Column) -> Result<Column> {
    if column.dtype() != &DataType::String {
        return Ok(column.clone());
    }

    let parsed: Vec<Option<Stamp>> = column
        .str()?
        .into_iter()
        .map(|v| v.and_then(parse_stamp))
        .collect();
    let name = column.name().clone();

    if parsed.iter().flatten().any(|s| matches!(s, Stamp::DateTime(_))) {
        let millis: Vec<Option<i64>> = parsed
            .iter()
            .map(|s| s.map(|s| s.to_datetime().and_utc().timestamp_millis()))
            .collect();
        return Ok(Column::new(name, millis)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?);
    }

    // NaiveDate::default() is 1970-01-01.
    let days: Vec<Option<i32>> = parsed
        .iter()
        .map(|s| s.map(|s| (s.to_date() - NaiveDate::default()).num_days() as i32))
        .collect();
    Ok(Column::new(name, days).cast(&DataType::Date)?)
}

#[derive(Debug, Clone, Copy)]
enum Stamp {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Stamp {
    fn to_date(self) -> NaiveDate {
        match self {
            Stamp::Date(d) => d,
            Stamp::DateTime(dt) => dt.date(),
        }
    }

    fn to_datetime(self) -> NaiveDateTime {
        match self {
            Stamp::Date(d) => d.and_time(chrono::NaiveTime::MIN),
            Stamp::DateTime(dt) => dt,
        }
    }
}

fn parse_stamp(raw: &str) -> Option<Stamp> {
    let raw = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(Stamp::Date(d));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(Stamp::DateTime(dt.naive_utc()));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Stamp::DateTime(dt));
        }
    }
    None
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect()
}
