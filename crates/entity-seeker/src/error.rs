//! Error types for the seeker crate.
//!
//! Malformed search expressions are not errors: they compile to an empty
//! result set. The variants here cover identifiers and configuration supplied
//! programmatically by the caller.

use thiserror::Error;

/// Errors that can occur when building identifiers or search configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeekerError {
    /// Text is not a `<type>-<local>` record id.
    #[error("invalid record id '{0}': expected <type>-<local>")]
    InvalidRecordId(String),

    /// The conjunction keyword cannot split an expression into clauses.
    #[error("invalid conjunction keyword '{keyword}': {reason}")]
    InvalidConjunction {
        keyword: String,
        reason: &'static str,
    },

    /// The reserved id field name cannot appear on the left of a clause.
    #[error("invalid id field '{field}': {reason}")]
    InvalidIdField { field: String, reason: &'static str },
}

/// Result type for seeker operations.
pub type Result<T> = std::result::Result<T, SeekerError>;
