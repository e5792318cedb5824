//! Response parsing: vendor CSV and JSON payloads into DataFrames.
//!
//! Column names always come out lowercased. CSV columns stay text until a
//! source coerces them; JSON scalars keep their JSON type.

use crate::error::{EodError, Result};
use polars::prelude::*;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

/// Field separator of every delimited endpoint.
pub const DELIMITER: u8 = b',';

/// Constant column appended to every parsed row (e.g. `symbol=AAPL.US`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Parse a delimited payload with a header row.
///
/// The vendor terminates every CSV body with a malformed row, so the last
/// data row is always dropped. Blank lines are skipped, short rows are padded
/// with nulls and empty fields are null.
pub fn parse_delimited(text: &str, extra: Option<&KeyValue>) -> Result<DataFrame> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let extra_key = extra.map(|kv| kv.key.to_lowercase());
    let headers: Vec<(usize, String)> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .enumerate()
        .filter(|(_, h)| extra_key.as_ref() != Some(h))
        .collect();
    ensure_unique(headers.iter().map(|(_, h)| h.as_str()))?;

    let mut records = reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    records.pop();

    let mut columns = Vec::with_capacity(headers.len() + 1);
    for (index, name) in &headers {
        let values: Vec<Option<String>> = records
            .iter()
            .map(|record| {
                record
                    .get(*index)
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(String::from)
            })
            .collect();
        columns.push(Column::new(name.as_str().into(), values));
    }

    if let (Some(key), Some(kv)) = (extra_key, extra) {
        columns.push(Column::new(
            key.as_str().into(),
            vec![kv.value.as_str(); records.len()],
        ));
    }

    Ok(DataFrame::new(columns)?)
}

/// Extract `document[key]` (one row) or `document[key][sub_key]` (one row per
/// child) as a table.
///
/// Returns `None` when the key path is missing, does not lead to an object or
/// collection, or holds no rows.
pub fn parse_nested(
    document: &Value,
    key: &str,
    sub_key: Option<&str>,
) -> Result<Option<DataFrame>> {
    let Some(level) = document.get(key) else {
        return Ok(None);
    };

    let rows: Vec<Map<String, Value>> = match sub_key {
        None => match level {
            Value::Object(obj) => vec![obj.clone()],
            _ => return Ok(None),
        },
        Some(sub_key) => match level.get(sub_key) {
            Some(Value::Object(children)) => children.values().map(as_row).collect(),
            Some(Value::Array(children)) => children.iter().map(as_row).collect(),
            _ => return Ok(None),
        },
    };

    if rows.iter().all(Map::is_empty) {
        return Ok(None);
    }
    rows_to_frame(&rows).map(Some)
}

/// Build a table from JSON objects, one row per object.
///
/// Columns are the union of all (lowercased) member names in first-seen
/// order; members absent from a row are null. Nested objects and arrays are
/// kept as compact JSON text. Two members of one row that differ only in case
/// are a [`EodError::MalformedBody`].
pub fn rows_to_frame(rows: &[Map<String, Value>]) -> Result<DataFrame> {
    let mut names: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut lowered: Vec<HashMap<String, &Value>> = Vec::with_capacity(rows.len());
    for row in rows {
        let mut members = HashMap::with_capacity(row.len());
        for (key, value) in row {
            let key = key.to_lowercase();
            if members.contains_key(&key) {
                return Err(EodError::MalformedBody(format!("duplicate column '{key}'")));
            }
            if seen.insert(key.clone()) {
                names.push(key.clone());
            }
            members.insert(key, value);
        }
        lowered.push(members);
    }

    let columns = names
        .iter()
        .map(|name| {
            let values: Vec<Option<&Value>> =
                lowered.iter().map(|row| row.get(name).copied()).collect();
            json_column(name, &values)
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}

/// Parse a JSON array of objects (macro indicators, economic events).
///
/// Returns `None` for an empty array.
pub fn parse_records(payload: &Value) -> Result<Option<DataFrame>> {
    let Value::Array(items) = payload else {
        return Err(EodError::MalformedBody(format!(
            "expected a JSON array, got {}",
            json_kind(payload)
        )));
    };
    if items.is_empty() {
        return Ok(None);
    }
    let rows: Vec<Map<String, Value>> = items.iter().map(as_row).collect();
    rows_to_frame(&rows).map(Some)
}

fn as_row(value: &Value) -> Map<String, Value> {
    match value {
        Value::Object(obj) => obj.clone(),
        other => {
            let mut row = Map::new();
            row.insert("value".to_string(), other.clone());
            row
        }
    }
}

fn json_column(name: &str, values: &[Option<&Value>]) -> Column {
    let present: Vec<&Value> = values
        .iter()
        .flatten()
        .copied()
        .filter(|v| !v.is_null())
        .collect();

    if !present.is_empty() && present.iter().all(|v| v.is_boolean()) {
        let data: Vec<Option<bool>> = values
            .iter()
            .map(|v| v.and_then(Value::as_bool))
            .collect();
        return Column::new(name.into(), data);
    }
    if !present.is_empty() && present.iter().all(|v| v.is_i64()) {
        let data: Vec<Option<i64>> = values.iter().map(|v| v.and_then(Value::as_i64)).collect();
        return Column::new(name.into(), data);
    }
    if !present.is_empty() && present.iter().all(|v| v.is_number()) {
        let data: Vec<Option<f64>> = values.iter().map(|v| v.and_then(Value::as_f64)).collect();
        return Column::new(name.into(), data);
    }

    let data: Vec<Option<String>> = values
        .iter()
        .map(|v| match v {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        })
        .collect();
    Column::new(name.into(), data)
}

fn ensure_unique<'a>(headers: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for h in headers {
        if !seen.insert(h) {
            return Err(EodError::MalformedBody(format!("duplicate column '{h}'")));
        }
    }
    Ok(())
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
