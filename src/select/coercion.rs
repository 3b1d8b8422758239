//! Type-driven conversion of result values.
//!
//! Each column in a result carries the engine's type name. A
//! [`Coercions`] table maps type names to conversion functions; values of
//! types without an entry, or that a conversion rejects, pass through
//! untouched.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::Value;

/// A record field after coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Raw(Value),
    Time(DateTime<Utc>),
}

impl FieldValue {
    /// The raw JSON value, if this field was not converted.
    pub fn as_raw(&self) -> Option<&Value> {
        match self {
            FieldValue::Raw(value) => Some(value),
            FieldValue::Time(_) => None,
        }
    }

    pub fn as_time(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Time(time) => Some(*time),
            FieldValue::Raw(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_raw().and_then(Value::as_str)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_raw().and_then(Value::as_i64)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_raw().and_then(Value::as_f64)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Raw(value) => write!(f, "{}", value),
            FieldValue::Time(time) => write!(f, "{}", time.to_rfc3339()),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::Raw(value)
    }
}

/// Conversion for one type. `None` means "leave the value as is".
pub type Coercion = fn(&Value) -> Option<FieldValue>;

/// Registry of conversions keyed by engine type name.
#[derive(Clone)]
pub struct Coercions {
    by_type: HashMap<String, Coercion>,
}

impl Coercions {
    /// A registry with no conversions at all.
    pub fn empty() -> Self {
        Self {
            by_type: HashMap::new(),
        }
    }

    /// Register (or replace) the conversion for `type_name`.
    pub fn register(&mut self, type_name: impl Into<String>, coercion: Coercion) -> &mut Self {
        self.by_type.insert(type_name.into(), coercion);
        self
    }

    /// Builder form of [`Coercions::register`].
    pub fn with(mut self, type_name: impl Into<String>, coercion: Coercion) -> Self {
        self.register(type_name, coercion);
        self
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.by_type.contains_key(type_name)
    }

    /// Convert `value` according to `type_name`.
    pub fn coerce(&self, value: &Value, type_name: &str) -> FieldValue {
        self.by_type
            .get(type_name)
            .and_then(|coercion| coercion(value))
            .unwrap_or_else(|| FieldValue::Raw(value.clone()))
    }
}

impl Default for Coercions {
    fn default() -> Self {
        Self::empty().with("Time", epoch_to_time)
    }
}

impl fmt::Debug for Coercions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<&String> = self.by_type.keys().collect();
        types.sort();
        f.debug_struct("Coercions").field("types", &types).finish()
    }
}

/// Seconds since the epoch (integer, float or numeric string) to a timestamp.
pub fn epoch_to_time(value: &Value) -> Option<FieldValue> {
    let seconds = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !seconds.is_finite() {
        return None;
    }

    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1_000_000_000.0).round() as u32;
    let (whole, nanos) = if nanos >= 1_000_000_000 {
        (whole + 1.0, 0)
    } else {
        (whole, nanos)
    };
    DateTime::<Utc>::from_timestamp(whole as i64, nanos).map(FieldValue::Time)
}
