//! Literal values carried by clauses.
//!
//! The [`Value`] enum is a borrowed view of a clause's literal. Expressions
//! only know strings and non-negative integers; an id range is a pair of
//! integers.

use std::fmt;

use crate::id::LocalId;

/// Literal of a parsed clause, borrowed from the clause.
///
/// # Example
///
/// ```
/// use entity_seeker::{parse, Value};
///
/// let query = parse(Some("id=[1,10] and name=Jo"));
/// assert_eq!(query.clauses()[0].value(), Some(Value::Range { low: 1, high: 10 }));
/// assert_eq!(query.clauses()[1].value(), Some(Value::Text("Jo")));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Value<'a> {
    /// String literal, as written.
    Text(&'a str),
    /// Non-negative integer literal.
    Integer(LocalId),
    /// Inclusive integer range, `low <= high`.
    Range { low: LocalId, high: LocalId },
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `Text` value.
    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    /// Returns `true` if this is an `Integer` value.
    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    /// Returns `true` if this is a `Range` value.
    pub fn is_range(&self) -> bool {
        matches!(self, Value::Range { .. })
    }

    /// Extracts the string literal, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the integer literal, if present.
    pub fn as_integer(&self) -> Option<LocalId> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the range bounds, if present.
    pub fn as_range(&self) -> Option<(LocalId, LocalId)> {
        match self {
            Value::Range { low, high } => Some((*low, *high)),
            _ => None,
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Range { low, high } => write!(f, "[{low},{high}]"),
        }
    }
}
