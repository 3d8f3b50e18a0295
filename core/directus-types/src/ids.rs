//! Identifier types for remotely stored entities.
//!
//! Directus assigns identifiers per collection: roles, policies and files use
//! UUID strings, permissions use auto-increment integers, and the settings
//! singleton carries whatever the instance returns. The engine never mints
//! identifiers itself.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Which representation a collection uses for its primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdKind {
    Text,
    Integer,
}

impl IdKind {
    /// Parses a user-supplied identifier (e.g. an import ID).
    ///
    /// Integer kinds accept only a plain base-10 integer here; the lenient
    /// float/string handling of [`canonical_int`] is reserved for values
    /// coming back from the API.
    pub fn parse(self, raw: &str) -> Result<RemoteId> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(self.invalid(raw));
        }
        match self {
            Self::Text => Ok(RemoteId::Text(trimmed.to_string())),
            Self::Integer => trimmed
                .parse::<i64>()
                .map(RemoteId::Int)
                .map_err(|_| self.invalid(raw)),
        }
    }

    /// Decodes an identifier from a response payload.
    pub fn decode(self, value: &Value) -> Result<RemoteId> {
        match self {
            Self::Integer => canonical_int(value).map(RemoteId::Int),
            Self::Text => match value {
                Value::String(s) if !s.is_empty() => Ok(RemoteId::Text(s.clone())),
                Value::Number(n) => Ok(RemoteId::Text(
                    n.as_i64().map_or_else(|| n.to_string(), |i| i.to_string()),
                )),
                other => Err(self.invalid(&other.to_string())),
            },
        }
    }

    fn invalid(self, value: &str) -> Error {
        Error::InvalidId {
            kind: self,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Integer => f.write_str("integer"),
        }
    }
}

/// Opaque identifier of a remote entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RemoteId {
    Int(i64),
    Text(String),
}

impl RemoteId {
    /// Returns the kind of this identifier.
    #[must_use]
    pub const fn kind(&self) -> IdKind {
        match self {
            Self::Int(_) => IdKind::Integer,
            Self::Text(_) => IdKind::Text,
        }
    }

    /// Returns the integer value, if this is an integer identifier.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Text(_) => None,
        }
    }

    /// Returns the identifier as JSON, preserving its wire type.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Int(i) => Value::from(*i),
            Self::Text(s) => Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for RemoteId {
    type Err = Error;

    /// Integers parse as [`RemoteId::Int`], anything else as text.
    fn from_str(s: &str) -> Result<Self> {
        IdKind::Integer
            .parse(s)
            .or_else(|_| IdKind::Text.parse(s))
    }
}

impl From<i64> for RemoteId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for RemoteId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RemoteId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Decodes a JSON value into its canonical integer form.
///
/// Accepts JSON integers, floats (truncated toward zero) and numeric strings
/// in either notation. Fails only when no numeric interpretation exists or the
/// value does not fit in an `i64`.
pub fn canonical_int(value: &Value) -> Result<i64> {
    let not_numeric = || Error::NotNumeric(value.to_string());
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            if let Some(u) = n.as_u64() {
                return i64::try_from(u).map_err(|_| not_numeric());
            }
            n.as_f64().and_then(truncate_f64).ok_or_else(not_numeric)
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Ok(i);
            }
            s.parse::<f64>()
                .ok()
                .and_then(truncate_f64)
                .ok_or_else(not_numeric)
        }
        _ => Err(not_numeric()),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn truncate_f64(f: f64) -> Option<i64> {
    // 2^63 is exactly representable, so the upper bound is exclusive.
    if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f.trunc() as i64)
    } else {
        None
    }
}
