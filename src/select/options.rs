//! Option names and values accepted by the `select` command.

use std::fmt;

/// Normalize a user-supplied option name to the engine's spelling.
///
/// `-` becomes `_`, then `drill_down` becomes `drilldown` and `sort_by`
/// becomes `sortby`. Normalizing twice gives the same result.
#[must_use]
pub fn normalize_option_name(name: &str) -> String {
    name.replace('-', "_")
        .replace("drill_down", "drilldown")
        .replace("sort_by", "sortby")
}

/// A `select` option.
///
/// Known options get their own variant; anything else is carried as
/// [`SelectOption::Other`] and passed to the engine verbatim, which is
/// where unknown options are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectOption {
    MatchColumns,
    Query,
    Filter,
    Scorer,
    SortBy,
    OutputColumns,
    Offset,
    Limit,
    Drilldown,
    DrilldownSortBy,
    DrilldownOutputColumns,
    DrilldownOffset,
    DrilldownLimit,
    Cache,
    MatchEscalationThreshold,
    /// Option this binding does not know about.
    Other(String),
}

impl SelectOption {
    /// Parse an option name, normalizing it first.
    pub fn parse(name: &str) -> Self {
        let normalized = normalize_option_name(name);
        match normalized.as_str() {
            "match_columns" => Self::MatchColumns,
            "query" => Self::Query,
            "filter" => Self::Filter,
            "scorer" => Self::Scorer,
            "sortby" => Self::SortBy,
            "output_columns" => Self::OutputColumns,
            "offset" => Self::Offset,
            "limit" => Self::Limit,
            "drilldown" => Self::Drilldown,
            "drilldown_sortby" => Self::DrilldownSortBy,
            "drilldown_output_columns" => Self::DrilldownOutputColumns,
            "drilldown_offset" => Self::DrilldownOffset,
            "drilldown_limit" => Self::DrilldownLimit,
            "cache" => Self::Cache,
            "match_escalation_threshold" => Self::MatchEscalationThreshold,
            _ => Self::Other(normalized),
        }
    }

    /// The engine's name for this option (without the leading `--`).
    pub fn as_str(&self) -> &str {
        match self {
            Self::MatchColumns => "match_columns",
            Self::Query => "query",
            Self::Filter => "filter",
            Self::Scorer => "scorer",
            Self::SortBy => "sortby",
            Self::OutputColumns => "output_columns",
            Self::Offset => "offset",
            Self::Limit => "limit",
            Self::Drilldown => "drilldown",
            Self::DrilldownSortBy => "drilldown_sortby",
            Self::DrilldownOutputColumns => "drilldown_output_columns",
            Self::DrilldownOffset => "drilldown_offset",
            Self::DrilldownLimit => "drilldown_limit",
            Self::Cache => "cache",
            Self::MatchEscalationThreshold => "match_escalation_threshold",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for SelectOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for SelectOption {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl From<String> for SelectOption {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

/// Value of a `select` option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Scalar(String),
    /// Rendered as a `", "`-joined list.
    List(Vec<String>),
}

impl OptionValue {
    /// Render the value as it appears between the quotes, unescaped.
    pub fn render(&self) -> String {
        match self {
            Self::Scalar(value) => value.clone(),
            Self::List(values) => values.join(", "),
        }
    }

    /// Render the value with `"` escaped as `\"`.
    pub fn escaped(&self) -> String {
        self.render().replace('"', "\\\"")
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<&String> for OptionValue {
    fn from(value: &String) -> Self {
        Self::Scalar(value.clone())
    }
}

macro_rules! scalar_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for OptionValue {
                fn from(value: $ty) -> Self {
                    Self::Scalar(value.to_string())
                }
            }
        )*
    };
}

scalar_from_display!(i32, i64, u32, u64, usize, f64, bool);

impl<T: Into<String>> From<Vec<T>> for OptionValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<String> + Clone> From<&[T]> for OptionValue {
    fn from(values: &[T]) -> Self {
        Self::List(values.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<String>, const N: usize> From<[T; N]> for OptionValue {
    fn from(values: [T; N]) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}
