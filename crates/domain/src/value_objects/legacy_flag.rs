//! Decoding of historically-encoded boolean flags.
//!
//! Earlier versions of the store wrote flags as booleans, numbers or
//! strings. [`LegacyFlag`] captures exactly which encoding was found so the
//! coercion rule is applied once, at the boundary, and everything past it
//! only ever sees `bool`.

use serde_json::Value;

/// A stored flag value, tagged by its encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum LegacyFlag {
    /// Nothing stored (missing key or JSON `null`)
    Absent,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Arrays and objects; only generic truthiness applies
    Other(Value),
}

impl LegacyFlag {
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Absent,
            Some(Value::Bool(b)) => Self::Bool(*b),
            Some(Value::Number(n)) => Self::Number(n.as_f64().unwrap_or(0.0)),
            Some(Value::String(s)) => Self::Text(s.clone()),
            Some(other) => Self::Other(other.clone()),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Decode to a boolean; `None` only when nothing is stored.
    ///
    /// - numbers are true when `> 0`
    /// - `"true"`/`"false"` match case-insensitively
    /// - anything else falls back to generic truthiness (non-empty string,
    ///   any array or object)
    pub fn coerce(&self) -> Option<bool> {
        match self {
            Self::Absent => None,
            Self::Bool(b) => Some(*b),
            Self::Number(n) => Some(*n > 0.0),
            Self::Text(s) => Some(match s.to_lowercase().as_str() {
                "true" => true,
                "false" => false,
                _ => !s.is_empty(),
            }),
            Self::Other(_) => Some(true),
        }
    }

    /// Decode with a default for the absent case.
    pub fn coerce_or(&self, default: bool) -> bool {
        self.coerce().unwrap_or(default)
    }

    /// True when the value only decoded through the truthiness fallback.
    ///
    /// Callers log these; they are never an error.
    pub fn is_ambiguous(&self) -> bool {
        match self {
            Self::Text(s) => !s.eq_ignore_ascii_case("true") && !s.eq_ignore_ascii_case("false"),
            Self::Other(_) => true,
            _ => false,
        }
    }
}

impl From<Option<&Value>> for LegacyFlag {
    fn from(value: Option<&Value>) -> Self {
        Self::from_value(value)
    }
}
