//! Schema model: tables, columns and indexes.

use serde::{Deserialize, Serialize};

use super::handle::TableHandle;

/// Value types built into the engine. Any other type name refers to a table.
pub const BUILTIN_TYPES: &[&str] = &[
    "Object",
    "Bool",
    "Int8",
    "UInt8",
    "Int16",
    "UInt16",
    "Int32",
    "UInt32",
    "Int64",
    "UInt64",
    "Float",
    "Time",
    "ShortText",
    "Text",
    "LongText",
    "TokyoGeoPoint",
    "WGS84GeoPoint",
];

/// Whether `type_name` is a built-in value type.
#[must_use]
pub fn is_builtin_type(type_name: &str) -> bool {
    BUILTIN_TYPES.contains(&type_name)
}

/// How a table stores its keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableType {
    /// No key; records are addressed by id only.
    #[default]
    Array,
    Hash,
    PatriciaTrie,
}

impl TableType {
    pub fn has_key(&self) -> bool {
        !matches!(self, TableType::Array)
    }
}

/// Source of an index column and its posting flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSpec {
    pub source_table: String,
    /// Column of the source table, or `_key`.
    pub source_column: String,
    #[serde(default)]
    pub with_section: bool,
    #[serde(default)]
    pub with_weight: bool,
    /// `None` means "on if the lexicon has a default tokenizer".
    #[serde(default)]
    pub with_position: Option<bool>,
}

impl IndexSpec {
    pub fn new(source_table: impl Into<String>, source_column: impl Into<String>) -> Self {
        Self {
            source_table: source_table.into(),
            source_column: source_column.into(),
            with_section: false,
            with_weight: false,
            with_position: None,
        }
    }

    /// Conventional index column name: `<SourceTable>_<source_column>`.
    pub fn column_name(&self) -> String {
        format!("{}_{}", self.source_table, self.source_column)
    }

    pub fn with_section(&mut self) -> &mut Self {
        self.with_section = true;
        self
    }

    pub fn with_weight(&mut self) -> &mut Self {
        self.with_weight = true;
        self
    }

    pub fn with_position(&mut self, enabled: bool) -> &mut Self {
        self.with_position = Some(enabled);
        self
    }
}

/// Column shape.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    #[default]
    Scalar,
    Vector,
    Index(IndexSpec),
}

/// A column definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    /// Built-in type name or referenced table name. For index columns,
    /// the source table.
    pub value_type: String,
    #[serde(default)]
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: value_type.into(),
            kind: ColumnKind::Scalar,
        }
    }

    /// Make this a vector column. Has no effect on index columns.
    pub fn vector(&mut self) -> &mut Self {
        if !self.is_index() {
            self.kind = ColumnKind::Vector;
        }
        self
    }

    pub fn is_vector(&self) -> bool {
        matches!(self.kind, ColumnKind::Vector)
    }

    pub fn is_index(&self) -> bool {
        matches!(self.kind, ColumnKind::Index(_))
    }

    pub fn index_spec(&self) -> Option<&IndexSpec> {
        match &self.kind {
            ColumnKind::Index(spec) => Some(spec),
            _ => None,
        }
    }

    /// Whether the value type names a table rather than a built-in type.
    pub fn is_reference(&self) -> bool {
        !self.is_index() && !is_builtin_type(&self.value_type)
    }
}

/// A table definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    pub name: String,
    #[serde(default, rename = "type")]
    pub table_type: TableType,
    #[serde(default)]
    pub key_type: Option<String>,
    #[serde(default)]
    pub key_normalize: bool,
    #[serde(default)]
    pub default_tokenizer: Option<String>,
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
}

impl TableSpec {
    pub fn new(name: impl Into<String>, options: TableOptions) -> Self {
        Self {
            name: name.into(),
            table_type: options.table_type,
            key_type: options.key_type,
            key_normalize: options.key_normalize,
            default_tokenizer: options.default_tokenizer,
            columns: Vec::new(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Add a column, replacing any column with the same name in place.
    pub fn upsert_column(&mut self, column: ColumnSpec) -> &mut ColumnSpec {
        let position = match self.columns.iter().position(|c| c.name == column.name) {
            Some(i) => {
                self.columns[i] = column;
                i
            }
            None => {
                self.columns.push(column);
                self.columns.len() - 1
            }
        };
        &mut self.columns[position]
    }

    /// Columns sorted by name.
    pub fn sorted_columns(&self) -> Vec<&ColumnSpec> {
        let mut columns: Vec<&ColumnSpec> = self.columns.iter().collect();
        columns.sort_by(|a, b| a.name.cmp(&b.name));
        columns
    }

    /// Effective position flag for an index column of this table.
    pub fn index_with_position(&self, index: &IndexSpec) -> bool {
        index
            .with_position
            .unwrap_or(self.default_tokenizer.is_some())
    }

    /// A handle over this table's columns.
    pub fn handle(&self) -> TableHandle {
        TableHandle::new(&self.name).with_columns(self.columns.iter().map(|c| c.name.clone()))
    }
}

/// Options for `create_table`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableOptions {
    pub table_type: TableType,
    pub key_type: Option<String>,
    pub key_normalize: bool,
    pub default_tokenizer: Option<String>,
}

impl TableOptions {
    /// Keyless table.
    pub fn array() -> Self {
        Self::default()
    }

    pub fn hash() -> Self {
        Self {
            table_type: TableType::Hash,
            ..Self::default()
        }
    }

    pub fn patricia_trie() -> Self {
        Self {
            table_type: TableType::PatriciaTrie,
            ..Self::default()
        }
    }

    pub fn key_type(mut self, key_type: impl Into<String>) -> Self {
        self.key_type = Some(key_type.into());
        self
    }

    pub fn key_normalize(mut self) -> Self {
        self.key_normalize = true;
        self
    }

    pub fn default_tokenizer(mut self, tokenizer: impl Into<String>) -> Self {
        self.default_tokenizer = Some(tokenizer.into());
        self
    }
}

/// Output syntax for a schema dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Syntax {
    /// Nested `create_table`/`change_table` blocks.
    #[default]
    Builder,
    /// Flat `table_create`/`column_create` commands.
    Command,
}

impl std::str::FromStr for Syntax {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "builder" => Ok(Syntax::Builder),
            "command" => Ok(Syntax::Command),
            other => Err(format!("unknown schema syntax: {}", other)),
        }
    }
}
