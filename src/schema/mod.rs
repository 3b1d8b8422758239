//! Schema definition and dumping.
//!
//! A schema is defined in a builder scope, frozen into a
//! [`SchemaDefinition`], and rendered to one of two textual syntaxes:
//!
//! ```text
//! Schema::define(|schema| ..)
//!          │
//!          ▼
//! SchemaDefinition ──► render_builder_syntax()   create_table(..) do |table| .. end
//!          │
//!          └─────────► render_command_syntax()   table_create .. / column_create ..
//! ```

mod builder;
pub mod dump;
mod handle;
mod types;

pub use builder::{Schema, SchemaBuilder, SchemaDefinition, SchemaError, TableBuilder};
pub use dump::{render_builder_syntax, render_command_syntax};
pub use handle::TableHandle;
pub use types::{
    is_builtin_type, ColumnKind, ColumnSpec, IndexSpec, Syntax, TableOptions, TableSpec,
    TableType, BUILTIN_TYPES,
};
