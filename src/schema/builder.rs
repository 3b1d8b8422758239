//! `Schema::define` and the immutable schema snapshot it produces.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::dump::{render_builder_syntax, render_command_syntax};
use super::handle::TableHandle;
use super::types::{ColumnKind, ColumnSpec, IndexSpec, Syntax, TableOptions, TableSpec};

/// Problems found by [`SchemaDefinition::validate`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("column {table}.{column} references unknown table <{target}>")]
    UnknownReference {
        table: String,
        column: String,
        target: String,
    },

    #[error("index {table}.{column} indexes unknown table <{source_table}>")]
    UnknownIndexSource {
        table: String,
        column: String,
        source_table: String,
    },

    #[error("index {table}.{column} indexes unknown column <{source_table}.{source_column}>")]
    UnknownIndexColumn {
        table: String,
        column: String,
        source_table: String,
        source_column: String,
    },

    #[error("table <{table}> has no key but declares key options")]
    KeyOnArray { table: String },

    #[error("change_table on unknown table <{table}>")]
    UnknownTable { table: String },
}

/// An ordered, immutable list of table definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    #[serde(default)]
    tables: Vec<TableSpec>,
    /// Tables passed to `change_table` without being defined.
    #[serde(skip)]
    unknown_tables: Vec<String>,
}

impl SchemaDefinition {
    pub fn new(tables: Vec<TableSpec>) -> Self {
        Self {
            tables,
            unknown_tables: Vec::new(),
        }
    }

    /// Tables in definition order.
    pub fn tables(&self) -> &[TableSpec] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&TableSpec> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Tables sorted by name.
    pub fn sorted_tables(&self) -> Vec<&TableSpec> {
        let mut tables: Vec<&TableSpec> = self.tables.iter().collect();
        tables.sort_by(|a, b| a.name.cmp(&b.name));
        tables
    }

    /// Handle for `name`, if the table is defined.
    pub fn handle(&self, name: &str) -> Option<TableHandle> {
        self.table(name).map(TableSpec::handle)
    }

    /// Check that changed tables, references and index sources point at
    /// defined tables and columns.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if let Some(table) = self.unknown_tables.first() {
            return Err(SchemaError::UnknownTable {
                table: table.clone(),
            });
        }

        for table in &self.tables {
            if !table.table_type.has_key()
                && (table.key_type.is_some() || table.key_normalize)
            {
                return Err(SchemaError::KeyOnArray {
                    table: table.name.clone(),
                });
            }

            for column in &table.columns {
                if let Some(index) = column.index_spec() {
                    self.validate_index(table, column, index)?;
                } else if column.is_reference() && self.table(&column.value_type).is_none() {
                    return Err(SchemaError::UnknownReference {
                        table: table.name.clone(),
                        column: column.name.clone(),
                        target: column.value_type.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn validate_index(
        &self,
        table: &TableSpec,
        column: &ColumnSpec,
        index: &IndexSpec,
    ) -> Result<(), SchemaError> {
        let source = self
            .table(&index.source_table)
            .ok_or_else(|| SchemaError::UnknownIndexSource {
                table: table.name.clone(),
                column: column.name.clone(),
                source_table: index.source_table.clone(),
            })?;

        let key_source = index.source_column == "_key" && source.table_type.has_key();
        if !key_source && source.column(&index.source_column).is_none() {
            return Err(SchemaError::UnknownIndexColumn {
                table: table.name.clone(),
                column: column.name.clone(),
                source_table: index.source_table.clone(),
                source_column: index.source_column.clone(),
            });
        }
        Ok(())
    }

    /// Render the schema in the requested syntax.
    pub fn dump(&self, syntax: Syntax) -> String {
        match syntax {
            Syntax::Builder => render_builder_syntax(self),
            Syntax::Command => render_command_syntax(self),
        }
    }
}

/// Entry point for defining a schema.
///
/// # Example
///
/// ```ignore
/// use grnbind::schema::{Schema, TableOptions};
///
/// let schema = Schema::define(|schema| {
///     schema.create_table("Posts", TableOptions::array(), |table| {
///         table.short_text("title");
///         table.short_text("comments").vector();
///     });
/// });
/// ```
pub struct Schema;

impl Schema {
    /// Run `define` against a fresh builder and return the finished schema.
    pub fn define(define: impl FnOnce(&mut SchemaBuilder)) -> SchemaDefinition {
        let mut builder = SchemaBuilder::default();
        define(&mut builder);
        builder.finish()
    }
}

/// Accumulates table definitions.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    tables: Vec<TableSpec>,
    unknown_tables: Vec<String>,
}

impl SchemaBuilder {
    /// Define a table, or add columns to one already defined in this scope.
    ///
    /// Table options of a repeated definition replace the earlier ones.
    pub fn create_table(
        &mut self,
        name: &str,
        options: TableOptions,
        define: impl FnOnce(&mut TableBuilder<'_>),
    ) -> &mut Self {
        let position = match self.tables.iter().position(|t| t.name == name) {
            Some(i) => {
                let existing = &mut self.tables[i];
                let columns = std::mem::take(&mut existing.columns);
                *existing = TableSpec::new(name, options);
                existing.columns = columns;
                i
            }
            None => {
                self.tables.push(TableSpec::new(name, options));
                self.tables.len() - 1
            }
        };

        let mut table = TableBuilder {
            table: &mut self.tables[position],
        };
        define(&mut table);
        self
    }

    /// Add or remove columns of a table defined earlier in this scope.
    ///
    /// An undefined `name` is recorded and reported by
    /// [`SchemaDefinition::validate`]; `define` is not run.
    pub fn change_table(&mut self, name: &str, define: impl FnOnce(&mut TableBuilder<'_>)) -> &mut Self {
        let Some(position) = self.tables.iter().position(|t| t.name == name) else {
            tracing::debug!(table = name, "change_table on undefined table");
            self.unknown_tables.push(name.to_string());
            return self;
        };
        let mut table = TableBuilder {
            table: &mut self.tables[position],
        };
        define(&mut table);
        self
    }

    pub fn finish(self) -> SchemaDefinition {
        SchemaDefinition {
            tables: self.tables,
            unknown_tables: self.unknown_tables,
        }
    }
}

/// Adds columns to one table.
#[derive(Debug)]
pub struct TableBuilder<'a> {
    table: &'a mut TableSpec,
}

macro_rules! typed_columns {
    ($($method:ident => $type_name:literal),* $(,)?) => {
        $(
            #[doc = concat!("Add a `", $type_name, "` column.")]
            pub fn $method(&mut self, name: &str) -> &mut ColumnSpec {
                self.column(name, $type_name)
            }
        )*
    };
}

impl<'a> TableBuilder<'a> {
    typed_columns! {
        bool => "Bool",
        int8 => "Int8",
        uint8 => "UInt8",
        int16 => "Int16",
        uint16 => "UInt16",
        int32 => "Int32",
        uint32 => "UInt32",
        int64 => "Int64",
        uint64 => "UInt64",
        float => "Float",
        time => "Time",
        short_text => "ShortText",
        text => "Text",
        long_text => "LongText",
        tokyo_geo_point => "TokyoGeoPoint",
        wgs84_geo_point => "WGS84GeoPoint",
    }

    pub fn name(&self) -> &str {
        &self.table.name
    }

    /// Add a scalar column of any type. Call `.vector()` on the result for a vector.
    pub fn column(&mut self, name: &str, value_type: &str) -> &mut ColumnSpec {
        self.table.upsert_column(ColumnSpec::new(name, value_type))
    }

    /// Add a column referencing records of `target`.
    pub fn reference(&mut self, name: &str, target: &str) -> &mut ColumnSpec {
        self.column(name, target)
    }

    /// Add an index over `source_table.source_column`, named by convention.
    pub fn index(&mut self, source_table: &str, source_column: &str) -> &mut IndexSpec {
        let spec = IndexSpec::new(source_table, source_column);
        let mut column = ColumnSpec::new(spec.column_name(), source_table);
        column.kind = ColumnKind::Index(spec);

        match &mut self.table.upsert_column(column).kind {
            ColumnKind::Index(spec) => spec,
            _ => unreachable!("index column was just inserted"),
        }
    }

    /// Remove a column, if present.
    pub fn remove_column(&mut self, name: &str) -> &mut Self {
        self.table.columns.retain(|c| c.name != name);
        self
    }
}
