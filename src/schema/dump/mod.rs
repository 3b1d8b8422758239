//! Schema dumpers.
//!
//! Both renderers are pure functions over an immutable [`SchemaDefinition`]
//! and share the same ordering rules: tables by name, columns by name,
//! reference and index columns deferred until every table exists.
//!
//! [`SchemaDefinition`]: crate::schema::SchemaDefinition

mod builder_syntax;
mod command_syntax;
pub mod format;

pub use builder_syntax::render_builder_syntax;
pub use command_syntax::render_command_syntax;

use crate::schema::types::{ColumnSpec, TableSpec};

/// Columns of `table` that must wait until all tables are created, by name.
fn deferred_columns(table: &TableSpec) -> Vec<&ColumnSpec> {
    table
        .sorted_columns()
        .into_iter()
        .filter(|c| c.is_reference() || c.is_index())
        .collect()
}
