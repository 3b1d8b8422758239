//! `select` command builder.

use once_cell::sync::Lazy;
use regex::Regex;

use super::options::{OptionValue, SelectOption};
use crate::expression::Expression;
use crate::schema::TableHandle;

/// Separator accepted between drill-down keys given as one string.
static DRILLDOWN_KEY_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\s+|\s*,\s*)").expect("valid drilldown separator regex"));

/// Table a command targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRef {
    ByName(String),
    ByHandle(TableHandle),
}

impl TableRef {
    /// The bare table name.
    pub fn name(&self) -> &str {
        match self {
            TableRef::ByName(name) => name,
            TableRef::ByHandle(handle) => handle.name(),
        }
    }
}

impl From<&str> for TableRef {
    fn from(name: &str) -> Self {
        TableRef::ByName(name.to_string())
    }
}

impl From<String> for TableRef {
    fn from(name: String) -> Self {
        TableRef::ByName(name)
    }
}

impl From<TableHandle> for TableRef {
    fn from(handle: TableHandle) -> Self {
        TableRef::ByHandle(handle)
    }
}

impl From<&TableHandle> for TableRef {
    fn from(handle: &TableHandle) -> Self {
        TableRef::ByHandle(handle.clone())
    }
}

/// A `select` request.
///
/// Options are emitted in the order they were first set; setting an
/// option again replaces its value in place.
///
/// # Example
///
/// ```ignore
/// use grnbind::select::SelectCommand;
///
/// let command = SelectCommand::new("Entries")
///     .option("output-columns", vec!["_key", "title"])
///     .option("drill-down", "tag");
/// assert_eq!(
///     command.to_command_string(),
///     r#"select Entries --output_columns "_key, title" --drilldown "tag""#
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
#[must_use = "select commands have no effect until rendered or executed"]
pub struct SelectCommand {
    table: TableRef,
    options: Vec<(SelectOption, OptionValue)>,
}

impl SelectCommand {
    pub fn new(table: impl Into<TableRef>) -> Self {
        Self {
            table: table.into(),
            options: Vec::new(),
        }
    }

    /// Set an option. The name is normalized.
    pub fn option(mut self, name: impl Into<SelectOption>, value: impl Into<OptionValue>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.options.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.options.push((name, value)),
        }
        self
    }

    /// Set several options in order.
    pub fn options<K, V>(self, options: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<SelectOption>,
        V: Into<OptionValue>,
    {
        options
            .into_iter()
            .fold(self, |command, (name, value)| command.option(name, value))
    }

    /// Set `--filter` from a built expression.
    pub fn filter_expression(self, expression: &Expression) -> Self {
        self.option(SelectOption::Filter, expression.to_script())
    }

    pub fn table(&self) -> &TableRef {
        &self.table
    }

    /// Options in emission order.
    pub fn option_entries(&self) -> &[(SelectOption, OptionValue)] {
        &self.options
    }

    /// Value of an option, if set.
    pub fn get(&self, option: &SelectOption) -> Option<&OptionValue> {
        self.options
            .iter()
            .find(|(name, _)| name == option)
            .map(|(_, value)| value)
    }

    /// Drill-down keys in the order their result blocks come back.
    pub fn drilldown_keys(&self) -> Vec<String> {
        match self.get(&SelectOption::Drilldown) {
            Some(OptionValue::List(keys)) => keys.clone(),
            Some(OptionValue::Scalar(keys)) => split_drilldown_keys(keys),
            None => Vec::new(),
        }
    }

    /// Render the command line sent to the engine.
    pub fn to_command_string(&self) -> String {
        let mut command = format!("select {}", self.table.name());
        for (name, value) in &self.options {
            command.push_str(&format!(" --{} \"{}\"", name, value.escaped()));
        }
        command
    }
}

/// Split a drill-down key list given as one string.
///
/// Keys may be separated by whitespace or by commas with optional
/// whitespace around them. Empty pieces are dropped.
pub fn split_drilldown_keys(keys: &str) -> Vec<String> {
    DRILLDOWN_KEY_SEPARATOR
        .split(keys)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}
