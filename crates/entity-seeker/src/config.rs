//! Search configuration.
//!
//! [`SearchConfig`] holds the two words of the expression syntax that are not
//! punctuation: the conjunction keyword joining clauses and the reserved field
//! name that addresses record ids. Both default to what the entity browser
//! accepts (`and`, `id`), and both can be loaded from any serde format.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeekerError};
use crate::op::Op;

/// Default keyword joining clauses.
pub const DEFAULT_CONJUNCTION: &str = "and";

/// Default reserved field name for record ids.
pub const DEFAULT_ID_FIELD: &str = "id";

/// Syntax settings for parsing search expressions.
///
/// # Example
///
/// ```
/// use entity_seeker::SearchConfig;
///
/// let config = SearchConfig::default().with_conjunction("AND");
/// assert!(config.validate().is_ok());
/// assert_eq!(config.id_field(), "id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    conjunction: String,
    id_field: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            conjunction: DEFAULT_CONJUNCTION.to_string(),
            id_field: DEFAULT_ID_FIELD.to_string(),
        }
    }
}

impl SearchConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        SearchConfig::default()
    }

    /// Sets the keyword joining clauses. Matched case-sensitively.
    pub fn with_conjunction(mut self, keyword: impl Into<String>) -> Self {
        self.conjunction = keyword.into();
        self
    }

    /// Sets the reserved field name addressing record ids.
    pub fn with_id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    /// Returns the conjunction keyword.
    pub fn conjunction(&self) -> &str {
        &self.conjunction
    }

    /// Returns the reserved id field name.
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Checks that both words can be recognized in an expression.
    ///
    /// The conjunction is matched as a whitespace-delimited token, so it must
    /// be a single non-empty word. Neither word may contain an operator
    /// symbol.
    pub fn validate(&self) -> Result<()> {
        if let Some(reason) = word_problem(&self.conjunction) {
            return Err(SeekerError::InvalidConjunction {
                keyword: self.conjunction.clone(),
                reason,
            });
        }
        if let Some(reason) = word_problem(&self.id_field) {
            return Err(SeekerError::InvalidIdField {
                field: self.id_field.clone(),
                reason,
            });
        }
        Ok(())
    }
}

fn word_problem(word: &str) -> Option<&'static str> {
    if word.is_empty() {
        Some("must not be empty")
    } else if word.chars().any(char::is_whitespace) {
        Some("must not contain whitespace")
    } else if word.chars().any(Op::is_symbol) {
        Some("must not contain an operator symbol")
    } else {
        None
    }
}
