//! Tagged classification of loosely-typed wire values.

use crate::ids::canonical_int;
use serde_json::Value;

/// A single attribute value as observed on the wire.
///
/// Directus does not guarantee a stable schema across versions, so every
/// observed value is first classified into one of these variants and only
/// then checked against the field kind the caller expects.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Int(i64),
    Bool(bool),
    Null,
    /// Arrays, objects, and non-integral numbers.
    Unknown(Value),
}

impl Scalar {
    /// Classifies a JSON value. Absent keys should be passed as `Value::Null`.
    #[must_use]
    pub fn classify(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::String(s) => Self::String(s.clone()),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Unknown(value.clone()),
            },
            Value::Array(_) | Value::Object(_) => Self::Unknown(value.clone()),
        }
    }

    /// Returns the string content, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns an integer interpretation, accepting integral floats and
    /// numeric strings.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::String(s) => canonical_int(&Value::String(s.clone())).ok(),
            Self::Unknown(v @ Value::Number(_)) => canonical_int(v).ok(),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&Value> for Scalar {
    fn from(value: &Value) -> Self {
        Self::classify(value)
    }
}
