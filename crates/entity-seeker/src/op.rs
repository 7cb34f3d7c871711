//! Clause operators.
//!
//! The [`Op`] enum names how a clause compares its literal against a record.
//! Only equality and prefix have a symbol in the expression syntax; a bare
//! number is an id lookup.

/// Comparison operator for a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Bare id: the whole clause is a local id.
    Lookup,
    /// `field=value`: exact match. On the id field the value may be a range.
    Eq,
    /// `field~value`: string prefix match.
    Prefix,
}

impl Op {
    /// Operators that appear between a field and a value, in the order they
    /// are looked for.
    pub const INFIX: [Op; 2] = [Op::Eq, Op::Prefix];

    /// Returns the character separating field and value, if any.
    pub fn symbol(self) -> Option<char> {
        match self {
            Op::Lookup => None,
            Op::Eq => Some('='),
            Op::Prefix => Some('~'),
        }
    }

    /// Returns the operator written as `symbol`.
    pub fn from_symbol(symbol: char) -> Option<Op> {
        Op::INFIX.into_iter().find(|op| op.symbol() == Some(symbol))
    }

    /// Returns `true` if `c` is an infix operator symbol.
    pub fn is_symbol(c: char) -> bool {
        Op::from_symbol(c).is_some()
    }

    /// Returns the display name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Lookup => "lookup",
            Op::Eq => "eq",
            Op::Prefix => "prefix",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
