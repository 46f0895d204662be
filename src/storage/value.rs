//! Stored Values
//!
//! A key holds exactly one scalar: either a UTF-8 string or a 64-bit signed
//! integer. Values are immutable; a SET replaces the whole value.

use std::fmt;

/// A value bound to a key in the [`Store`](crate::storage::Store).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Plain text, stored as given
    String(String),
    /// Integer, stored from a `:`-prefixed SET argument
    Integer(i64),
}

impl Value {
    /// Returns the type name reported in logs.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Integer(n) => write!(f, "{}", n),
        }
    }
}
