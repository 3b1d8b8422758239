//! Table handles.

use serde::{Deserialize, Serialize};

/// Pseudo columns every table exposes.
const BUILTIN_COLUMNS: &[&str] = &["_id", "_key", "_value", "_score", "_nsubrecs"];

/// A resolved table: its name and the columns it is known to have.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableHandle {
    name: String,
    columns: Vec<String>,
}

impl TableHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Add a column name.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.columns.push(column.into());
        self
    }

    /// Add several column names.
    pub fn with_columns(mut self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared columns, excluding pseudo columns.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Whether `column` can be referenced on this table.
    pub fn has_column(&self, column: &str) -> bool {
        BUILTIN_COLUMNS.contains(&column) || self.columns.iter().any(|c| c == column)
    }
}
