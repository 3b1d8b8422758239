//! Filter expressions checked against a table handle.
//!
//! # Example
//!
//! ```ignore
//! use grnbind::expression::ExpressionBuilder;
//! use grnbind::schema::TableHandle;
//!
//! let users = TableHandle::new("Users").with_columns(["name", "age"]);
//! let builder = ExpressionBuilder::new(&users);
//! let filter = builder.column("name")?.eq("alice").and(builder.column("age")?.lt(20));
//! assert_eq!(filter.to_script(), r#"name == "alice" && age < 20"#);
//! ```

use std::fmt;

use thiserror::Error;

use crate::schema::TableHandle;

/// Errors raised while building an expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("unknown column <{column:?}> for table <{table}>")]
    UnknownColumn { column: String, table: String },

    #[error("{0} has no representation in a filter script")]
    NonFiniteNumber(f64),
}

/// Operators understood by the engine's script syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Equal,
    Match,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Equal => "==",
            Operation::Match => "@",
            Operation::Less => "<",
            Operation::LessEqual => "<=",
            Operation::Greater => ">",
            Operation::GreaterEqual => ">=",
            Operation::And => "&&",
        }
    }
}

/// Literal operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Text(s) => {
                write!(f, "\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
            }
            Constant::Int(n) => write!(f, "{}", n),
            Constant::Float(n) => write!(f, "{}", n),
            Constant::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Constant {
    fn from(s: &str) -> Self {
        Constant::Text(s.to_string())
    }
}

impl From<String> for Constant {
    fn from(s: String) -> Self {
        Constant::Text(s)
    }
}

impl From<i32> for Constant {
    fn from(n: i32) -> Self {
        Constant::Int(n.into())
    }
}

impl From<i64> for Constant {
    fn from(n: i64) -> Self {
        Constant::Int(n)
    }
}

/// Only finite numbers can be written in a script.
impl TryFrom<f64> for Constant {
    type Error = ExpressionError;

    fn try_from(n: f64) -> Result<Self, Self::Error> {
        if n.is_finite() {
            Ok(Constant::Float(n))
        } else {
            Err(ExpressionError::NonFiniteNumber(n))
        }
    }
}

impl From<bool> for Constant {
    fn from(b: bool) -> Self {
        Constant::Bool(b)
    }
}

/// A built filter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Compare {
        column: String,
        op: Operation,
        value: Constant,
    },
    And(Box<Expression>, Box<Expression>),
}

impl Expression {
    /// Combine with another expression using `&&`.
    #[must_use]
    pub fn and(self, other: Expression) -> Expression {
        Expression::And(Box::new(self), Box::new(other))
    }

    /// Render in the engine's script syntax, suitable for `--filter`.
    pub fn to_script(&self) -> String {
        match self {
            Expression::Compare { column, op, value } => {
                format!("{} {} {}", column, op.as_str(), value)
            }
            Expression::And(left, right) => format!(
                "{} {} {}",
                left.to_script(),
                Operation::And.as_str(),
                right.to_script()
            ),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_script())
    }
}

/// Builds expressions over the columns of one table.
#[derive(Debug, Clone, Copy)]
pub struct ExpressionBuilder<'a> {
    table: &'a TableHandle,
}

impl<'a> ExpressionBuilder<'a> {
    pub fn new(table: &'a TableHandle) -> Self {
        Self { table }
    }

    /// Start an expression on `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ExpressionError::UnknownColumn`] if the table has no such column.
    pub fn column(&self, name: &str) -> Result<ColumnExpression, ExpressionError> {
        if !self.table.has_column(name) {
            return Err(ExpressionError::UnknownColumn {
                column: name.to_string(),
                table: self.table.name().to_string(),
            });
        }
        Ok(ColumnExpression {
            column: name.to_string(),
        })
    }
}

/// A column awaiting its comparison.
#[derive(Debug, Clone)]
pub struct ColumnExpression {
    column: String,
}

impl ColumnExpression {
    fn compare(self, op: Operation, value: impl Into<Constant>) -> Expression {
        Expression::Compare {
            column: self.column,
            op,
            value: value.into(),
        }
    }

    pub fn eq(self, value: impl Into<Constant>) -> Expression {
        self.compare(Operation::Equal, value)
    }

    /// Full-text match (`@`).
    pub fn matches(self, value: impl Into<Constant>) -> Expression {
        self.compare(Operation::Match, value)
    }

    pub fn lt(self, value: impl Into<Constant>) -> Expression {
        self.compare(Operation::Less, value)
    }

    pub fn le(self, value: impl Into<Constant>) -> Expression {
        self.compare(Operation::LessEqual, value)
    }

    pub fn gt(self, value: impl Into<Constant>) -> Expression {
        self.compare(Operation::Greater, value)
    }

    pub fn ge(self, value: impl Into<Constant>) -> Expression {
        self.compare(Operation::GreaterEqual, value)
    }
}
