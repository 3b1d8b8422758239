//! # grnbind
//!
//! Client-side bindings for a full-text search engine's command protocol.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │           SelectCommand (options, filter)                │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [to_command_string]
//! ┌─────────────────────────────────────────────────────────┐
//! │        Context (request id correlation, timeout)         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [Channel::send / Channel::receive]
//! ┌─────────────────────────────────────────────────────────┐
//! │      SelectResult (primary block + drill-downs)          │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [records]
//! ┌─────────────────────────────────────────────────────────┐
//! │              Record (coerced field values)               │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Schemas are defined with [`schema::Schema::define`] and dumped in
//! builder or command syntax.

pub mod channel;
pub mod config;
pub mod context;
pub mod expression;
pub mod logging;
pub mod schema;
pub mod select;
pub mod version;

/// Commonly used types.
pub mod prelude {
    pub use crate::channel::{Channel, MemoryChannel, RequestId};
    pub use crate::context::{Context, ContextError, MatchPolicy};
    pub use crate::expression::{Expression, ExpressionBuilder};
    pub use crate::schema::{Schema, SchemaDefinition, Syntax, TableHandle, TableOptions};
    pub use crate::select::{FieldValue, Record, SelectCommand, SelectResult};
}

pub use version::bindings_version;
