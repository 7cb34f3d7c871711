//! Query parsing.
//!
//! A [`Query`] is the ordered list of clauses of one search expression. The
//! [`ClauseParser`] splits an expression on the conjunction keyword and
//! classifies each part with [`Clause::parse`].

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::clause::Clause;
use crate::config::{SearchConfig, DEFAULT_CONJUNCTION};
use crate::error::Result;

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").expect("token pattern is valid"));

/// An ordered conjunction of clauses.
///
/// A query with no clauses matches every record of the searched type.
/// Clause order never changes which records match, but it is preserved so
/// that compilation and diagnostics are reproducible.
///
/// # Example
///
/// ```
/// use entity_seeker::{parse, ClauseKind};
///
/// let query = parse(Some("firstName~Jo and lastName=McClane"));
/// let kinds: Vec<_> = query.iter().map(|c| c.kind()).collect();
/// assert_eq!(kinds, [ClauseKind::FieldPrefix, ClauseKind::FieldEquals]);
///
/// assert!(parse(None).is_empty());
/// assert!(parse(Some("   ")).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Query {
    clauses: Vec<Clause>,
}

impl Query {
    /// Creates a query with no clauses.
    pub fn new() -> Self {
        Query::default()
    }

    /// Appends a clause.
    pub fn and(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Renders the clauses joined by `conjunction`.
    ///
    /// ```
    /// use entity_seeker::{ClauseParser, SearchConfig};
    ///
    /// let parser = ClauseParser::new(SearchConfig::default().with_conjunction("&&")).unwrap();
    /// let query = parser.parse(Some("a=1 && 2"));
    /// assert_eq!(query.display_with("&&").to_string(), "a=1 && 2");
    /// assert_eq!(query.to_string(), "a=1 and 2");
    /// ```
    pub fn display_with<'a>(&'a self, conjunction: &'a str) -> DisplayQuery<'a> {
        DisplayQuery {
            query: self,
            conjunction,
        }
    }

    /// Returns the clauses in expression order.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Iterates the clauses in expression order.
    pub fn iter(&self) -> std::slice::Iter<'_, Clause> {
        self.clauses.iter()
    }

    /// Returns the number of clauses.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Returns `true` if this query has no clauses (matches everything).
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Returns `true` if any clause is malformed, which empties the result.
    pub fn is_unsatisfiable(&self) -> bool {
        self.clauses.iter().any(Clause::is_malformed)
    }
}

impl FromIterator<Clause> for Query {
    fn from_iter<I: IntoIterator<Item = Clause>>(iter: I) -> Self {
        Query {
            clauses: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Query {
    type Item = &'a Clause;
    type IntoIter = std::slice::Iter<'a, Clause>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.iter()
    }
}

/// Writes the query with the default conjunction keyword; use
/// [`Query::display_with`] for another one.
impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_with(DEFAULT_CONJUNCTION))
    }
}

/// A [`Query`] rendered with a chosen conjunction keyword.
///
/// Returned by [`Query::display_with`].
#[derive(Debug, Clone, Copy)]
pub struct DisplayQuery<'a> {
    query: &'a Query,
    conjunction: &'a str,
}

impl fmt::Display for DisplayQuery<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.query.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", self.conjunction)?;
            }
            write!(f, "{clause}")?;
        }
        Ok(())
    }
}

/// Parses search expressions with a given [`SearchConfig`].
#[derive(Debug, Clone, Default)]
pub struct ClauseParser {
    config: SearchConfig,
}

impl ClauseParser {
    /// Creates a parser, rejecting configurations it could not honor.
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(ClauseParser { config })
    }

    /// Returns the parser's configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Parses an expression into a query.
    ///
    /// Absent or blank input gives the empty query. Otherwise the trimmed
    /// input is split wherever the conjunction keyword stands as a whole
    /// whitespace-delimited token, and every part becomes one clause, even
    /// an empty part between two keywords.
    pub fn parse(&self, expression: Option<&str>) -> Query {
        let Some(text) = expression.map(str::trim).filter(|t| !t.is_empty()) else {
            return Query::new();
        };

        split_conjuncts(text, self.config.conjunction())
            .into_iter()
            .map(|part| {
                let clause = Clause::parse(part, self.config.id_field());
                trace!(part, kind = %clause.kind(), "classified clause");
                clause
            })
            .collect()
    }
}

/// Parses an expression with the default syntax (`and`, `id`).
pub fn parse(expression: Option<&str>) -> Query {
    ClauseParser::default().parse(expression)
}

fn split_conjuncts<'a>(text: &'a str, keyword: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for token in TOKEN.find_iter(text) {
        if token.as_str() == keyword {
            parts.push(text[start..token.start()].trim());
            start = token.end();
        }
    }
    parts.push(text[start..].trim());
    parts
}
