//! The `select` command: request building and response parsing.

mod coercion;
mod command;
mod options;
mod result;

pub use coercion::{epoch_to_time, Coercion, Coercions, FieldValue};
pub use command::{split_drilldown_keys, SelectCommand, TableRef};
pub use options::{normalize_option_name, OptionValue, SelectOption};
pub use result::{
    create_records, ColumnDescriptor, DrillDownResult, Record, ResultError, SelectResult,
};
