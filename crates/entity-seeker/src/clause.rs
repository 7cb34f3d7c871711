//! Clause types for search predicates.
//!
//! A [`Clause`] is one conjunct of a search expression, already classified
//! by shape. Classification is total: text that fits no shape becomes one of
//! the malformed variants, which compile to an empty result set instead of
//! reaching the store.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::id::{is_digits, LocalId};
use crate::op::Op;
use crate::value::Value;

/// `[low,high]` with bare digit runs and nothing else.
static ID_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[([0-9]+),([0-9]+)\]$").expect("id range pattern is valid"));

/// Signed or unsigned digit runs: numeric to a reader, even when not a valid id.
static NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?[0-9]+$").expect("numeric pattern is valid"));

/// A single classified search predicate.
///
/// # Example
///
/// ```
/// use entity_seeker::{parse, Clause, ClauseKind};
///
/// let query = parse(Some("firstName~Jo and 17"));
/// assert_eq!(
///     query.clauses()[0],
///     Clause::FieldPrefix { field: "firstName".into(), value: "Jo".into() },
/// );
/// assert_eq!(query.clauses()[1].kind(), ClauseKind::IdLookup);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Clause {
    /// Bare clause, or id literal, that is not a valid local id.
    MalformedId(String),
    /// Clause with an operator but no field before it: `=x`, `~x`.
    MalformedClause(String),
    /// Bare local id: `42`.
    IdLookup(LocalId),
    /// Id field equal to a local id: `id=42`.
    ///
    /// Matches the record with that local id, or records whose `field`
    /// property is the decimal string of `id`.
    IdEqualsMatch { field: String, id: LocalId },
    /// Id field within an inclusive range: `id=[1,10]`.
    ///
    /// Matches records whose local id is in range, or whose `field` property
    /// is an integer in range.
    IdRangeMatch {
        field: String,
        low: LocalId,
        high: LocalId,
    },
    /// Property equal to a string: `lastName=McClane`.
    FieldEquals { field: String, value: String },
    /// Property starting with a string: `firstName~Jo`.
    FieldPrefix { field: String, value: String },
}

/// Discriminant of a [`Clause`], for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    MalformedId,
    MalformedClause,
    IdLookup,
    IdEqualsMatch,
    IdRangeMatch,
    FieldEquals,
    FieldPrefix,
}

impl ClauseKind {
    /// Returns the display name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ClauseKind::MalformedId => "malformed-id",
            ClauseKind::MalformedClause => "malformed-clause",
            ClauseKind::IdLookup => "id-lookup",
            ClauseKind::IdEqualsMatch => "id-equals",
            ClauseKind::IdRangeMatch => "id-range",
            ClauseKind::FieldEquals => "field-equals",
            ClauseKind::FieldPrefix => "field-prefix",
        }
    }
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Clause {
    /// Classifies one trimmed conjunct.
    ///
    /// `id_field` is the reserved field name whose values are read as local
    /// ids or id ranges.
    ///
    /// Equality is tried before prefix: any `=` with a non-empty field to its
    /// left makes an equality clause, even when a `~` comes first. The value
    /// may be empty.
    pub fn parse(text: &str, id_field: &str) -> Clause {
        let text = text.trim();

        if !text.contains(Op::is_symbol) {
            return Clause::bare(text);
        }

        if let Some((field, value)) = split_at(text, Op::Eq) {
            return if field == id_field {
                Clause::id_equality(text, field, value)
            } else {
                Clause::FieldEquals {
                    field: field.to_string(),
                    value: value.to_string(),
                }
            };
        }

        match split_at(text, Op::Prefix) {
            Some((field, value)) if !field.contains('=') => Clause::FieldPrefix {
                field: field.to_string(),
                value: value.to_string(),
            },
            _ => Clause::MalformedClause(text.to_string()),
        }
    }

    fn bare(text: &str) -> Clause {
        match parse_local_id(text) {
            Some(id) => Clause::IdLookup(id),
            None => Clause::MalformedId(text.to_string()),
        }
    }

    fn id_equality(text: &str, field: &str, value: &str) -> Clause {
        if let Some(caps) = ID_RANGE.captures(value) {
            let low = parse_local_id(&caps[1]);
            let high = parse_local_id(&caps[2]);
            return match (low, high) {
                (Some(low), Some(high)) if low <= high => Clause::IdRangeMatch {
                    field: field.to_string(),
                    low,
                    high,
                },
                _ => Clause::MalformedId(text.to_string()),
            };
        }

        if let Some(id) = parse_local_id(value) {
            return Clause::IdEqualsMatch {
                field: field.to_string(),
                id,
            };
        }

        let bracketed = value.starts_with('[') && value.ends_with(']');
        if bracketed || NUMERIC.is_match(value) {
            return Clause::MalformedId(text.to_string());
        }

        Clause::FieldEquals {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Returns the kind of this clause.
    pub fn kind(&self) -> ClauseKind {
        match self {
            Clause::MalformedId(_) => ClauseKind::MalformedId,
            Clause::MalformedClause(_) => ClauseKind::MalformedClause,
            Clause::IdLookup(_) => ClauseKind::IdLookup,
            Clause::IdEqualsMatch { .. } => ClauseKind::IdEqualsMatch,
            Clause::IdRangeMatch { .. } => ClauseKind::IdRangeMatch,
            Clause::FieldEquals { .. } => ClauseKind::FieldEquals,
            Clause::FieldPrefix { .. } => ClauseKind::FieldPrefix,
        }
    }

    /// Returns the property name the clause constrains, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Clause::IdEqualsMatch { field, .. }
            | Clause::IdRangeMatch { field, .. }
            | Clause::FieldEquals { field, .. }
            | Clause::FieldPrefix { field, .. } => Some(field),
            Clause::MalformedId(_) | Clause::MalformedClause(_) | Clause::IdLookup(_) => None,
        }
    }

    /// Returns the operator of a well-formed clause.
    pub fn op(&self) -> Option<Op> {
        match self {
            Clause::IdLookup(_) => Some(Op::Lookup),
            Clause::IdEqualsMatch { .. }
            | Clause::IdRangeMatch { .. }
            | Clause::FieldEquals { .. } => Some(Op::Eq),
            Clause::FieldPrefix { .. } => Some(Op::Prefix),
            Clause::MalformedId(_) | Clause::MalformedClause(_) => None,
        }
    }

    /// Returns the literal of a well-formed clause.
    pub fn value(&self) -> Option<Value<'_>> {
        match self {
            Clause::IdLookup(id) | Clause::IdEqualsMatch { id, .. } => Some(Value::Integer(*id)),
            Clause::IdRangeMatch { low, high, .. } => Some(Value::Range {
                low: *low,
                high: *high,
            }),
            Clause::FieldEquals { value, .. } | Clause::FieldPrefix { value, .. } => {
                Some(Value::Text(value))
            }
            Clause::MalformedId(_) | Clause::MalformedClause(_) => None,
        }
    }

    /// Returns `true` for clauses that compile to an empty result set
    /// without consulting the store.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Clause::MalformedId(_) | Clause::MalformedClause(_))
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::MalformedId(text) | Clause::MalformedClause(text) => write!(f, "{text}"),
            Clause::IdLookup(id) => write!(f, "{id}"),
            Clause::IdEqualsMatch { field, id } => write!(f, "{field}={id}"),
            Clause::IdRangeMatch { field, low, high } => write!(f, "{field}=[{low},{high}]"),
            Clause::FieldEquals { field, value } => write!(f, "{field}={value}"),
            Clause::FieldPrefix { field, value } => write!(f, "{field}~{value}"),
        }
    }
}

/// Splits at the first `op` symbol into a trimmed, non-empty field and a
/// trimmed value.
fn split_at(text: &str, op: Op) -> Option<(&str, &str)> {
    let (field, value) = text.split_once(op.symbol()?)?;
    let field = field.trim();
    if field.is_empty() {
        return None;
    }
    Some((field, value.trim()))
}

fn parse_local_id(text: &str) -> Option<LocalId> {
    if !is_digits(text) {
        return None;
    }
    text.parse().ok()
}
