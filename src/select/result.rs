//! Parsing of `select` responses.
//!
//! A response is a JSON array of result blocks. The first block is the
//! primary result; every following block is a drill-down result, matched
//! to the request's drill-down keys by position. Each block looks like:
//!
//! ```text
//! [[n_hits], [[column, type], ...], [value, ...], [value, ...], ...]
//! ```

use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::coercion::{Coercions, FieldValue};

/// Errors raised while parsing a response payload.
#[derive(Error, Debug)]
pub enum ResultError {
    #[error("failed to deserialize response: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("malformed response payload: {0}")]
    MalformedPayload(String),

    #[error("malformed result block {index}: {reason}")]
    MalformedBlock { index: usize, reason: String },

    #[error("drill-down result {index} has no matching drill-down key")]
    MissingDrilldownKey { index: usize },
}

/// A result column: its name and declared engine type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct ColumnDescriptor {
    pub name: String,
    pub type_name: String,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

impl From<(String, String)> for ColumnDescriptor {
    fn from((name, type_name): (String, String)) -> Self {
        Self { name, type_name }
    }
}

impl From<ColumnDescriptor> for (String, String) {
    fn from(column: ColumnDescriptor) -> Self {
        (column.name, column.type_name)
    }
}

/// One row, keyed by column name in column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Map rows to records, coercing each value by its column's type.
///
/// Cells missing from a short row become `null`.
pub fn create_records(
    columns: &[ColumnDescriptor],
    values: &[Vec<Value>],
    coercions: &Coercions,
) -> Vec<Record> {
    values
        .iter()
        .map(|row| {
            columns
                .iter()
                .enumerate()
                .map(|(i, column)| {
                    let value = row.get(i).unwrap_or(&Value::Null);
                    (column.name.clone(), coercions.coerce(value, &column.type_name))
                })
                .collect()
        })
        .collect()
}

/// Hit count, columns and rows of one block.
#[derive(Debug)]
struct ExtractedBlock {
    n_hits: u64,
    columns: Vec<ColumnDescriptor>,
    values: Vec<Vec<Value>>,
}

fn extract_result(block: Value, index: usize) -> Result<ExtractedBlock, ResultError> {
    let malformed = |reason: &str| ResultError::MalformedBlock {
        index,
        reason: reason.to_string(),
    };

    let Value::Array(parts) = block else {
        return Err(malformed("block is not an array"));
    };
    let mut parts = parts.into_iter();

    let meta = parts.next().ok_or_else(|| malformed("missing metadata"))?;
    let n_hits = meta
        .as_array()
        .and_then(|meta| meta.first())
        .and_then(Value::as_u64)
        .ok_or_else(|| malformed("metadata does not start with a hit count"))?;

    let columns = match parts.next() {
        Some(columns) => Vec::<ColumnDescriptor>::deserialize(columns)
            .map_err(|e| malformed(&format!("invalid column list: {}", e)))?,
        None => Vec::new(),
    };

    let values = parts
        .map(|row| match row {
            Value::Array(cells) => Ok(cells),
            _ => Err(malformed("row is not an array")),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ExtractedBlock {
        n_hits,
        columns,
        values,
    })
}

/// A drill-down result, same shape as the primary result.
#[derive(Debug)]
pub struct DrillDownResult {
    pub n_hits: u64,
    pub columns: Vec<ColumnDescriptor>,
    pub values: Vec<Vec<Value>>,
    coercions: Arc<Coercions>,
    records: OnceCell<Vec<Record>>,
}

impl DrillDownResult {
    /// Records, built on first access.
    pub fn records(&self) -> &[Record] {
        self.records
            .get_or_init(|| create_records(&self.columns, &self.values, &self.coercions))
    }
}

/// Parsed `select` response.
#[derive(Debug)]
pub struct SelectResult {
    pub n_hits: u64,
    pub columns: Vec<ColumnDescriptor>,
    pub values: Vec<Vec<Value>>,
    /// Drill-down results in response order, keyed by drill-down key.
    pub drill_down: Vec<(String, DrillDownResult)>,
    coercions: Arc<Coercions>,
    records: OnceCell<Vec<Record>>,
}

impl SelectResult {
    /// Parse a payload with the default coercions.
    pub fn parse<S: AsRef<str>>(raw: &str, drilldown_keys: &[S]) -> Result<Self, ResultError> {
        Self::parse_with(raw, drilldown_keys, Arc::new(Coercions::default()))
    }

    /// Parse a payload, coercing record values with `coercions`.
    pub fn parse_with<S: AsRef<str>>(
        raw: &str,
        drilldown_keys: &[S],
        coercions: Arc<Coercions>,
    ) -> Result<Self, ResultError> {
        let payload: Value = serde_json::from_str(raw)?;
        let Value::Array(blocks) = payload else {
            return Err(ResultError::MalformedPayload(
                "expected an array of result blocks".to_string(),
            ));
        };
        let mut blocks = blocks.into_iter();

        let primary = blocks
            .next()
            .ok_or_else(|| ResultError::MalformedPayload("no result blocks".to_string()))?;
        let primary = extract_result(primary, 0)?;

        let drill_down = blocks
            .enumerate()
            .map(|(i, block)| -> Result<(String, DrillDownResult), ResultError> {
                let key = drilldown_keys
                    .get(i)
                    .ok_or(ResultError::MissingDrilldownKey { index: i })?;
                let extracted = extract_result(block, i + 1)?;
                Ok((
                    key.as_ref().to_string(),
                    DrillDownResult {
                        n_hits: extracted.n_hits,
                        columns: extracted.columns,
                        values: extracted.values,
                        coercions: coercions.clone(),
                        records: OnceCell::new(),
                    },
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            n_hits = primary.n_hits,
            rows = primary.values.len(),
            drill_downs = drill_down.len(),
            "parsed select result"
        );

        Ok(Self {
            n_hits: primary.n_hits,
            columns: primary.columns,
            values: primary.values,
            drill_down,
            coercions,
            records: OnceCell::new(),
        })
    }

    /// Records, built on first access.
    pub fn records(&self) -> &[Record] {
        self.records
            .get_or_init(|| create_records(&self.columns, &self.values, &self.coercions))
    }

    /// Drill-down result for `key`.
    pub fn drill_down(&self, key: &str) -> Option<&DrillDownResult> {
        self.drill_down
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, result)| result)
    }

    /// Whether records have been materialized yet.
    pub fn records_materialized(&self) -> bool {
        self.records.get().is_some()
    }
}
