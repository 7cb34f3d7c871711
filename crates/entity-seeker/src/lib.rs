//! Seeker - Search-expression compiler for transactional record stores.
//!
//! Seeker turns the short expressions users type into an entity browser's
//! search box into a composite query over a record store. It supports:
//!
//! - Bare ids: `42`
//! - Id equality and id ranges: `id=42`, `id=[1,10]`
//! - Property equality: `lastName=McClane`
//! - Property prefix: `firstName~Jo`
//! - Conjunction of any of the above: `firstName~Jo and lastName=McClane`
//!
//! # Quick Start
//!
//! ```rust
//! use entity_seeker::{search, MemoryStore, ResultSet};
//!
//! let mut store = MemoryStore::new();
//! store.insert("User", [("firstName", "John"), ("lastName", "McClane")]);
//! store.insert("User", [("firstName", "Holly"), ("lastName", "McClane")]);
//! let user = store.type_id("User").unwrap();
//!
//! let tx = store.begin();
//! let hits = search(Some("lastName=McClane"), "User", user, &tx).unwrap();
//! assert_eq!(hits.len(), 2);
//!
//! let all = search(None, "User", user, &tx).unwrap();
//! assert_eq!(all.len(), 2);
//!
//! // Malformed clauses match nothing, and so empty the whole conjunction.
//! let none = search(Some("lastName=McClane and 1x"), "User", user, &tx).unwrap();
//! assert!(none.is_empty());
//! ```
//!
//! # Query Semantics
//!
//! Every clause becomes one result set; the results are intersected:
//!
//! ```text
//! search("")            = all_of_type(T)
//! search("c1 and c2")   = r(c1) ∩ r(c2)
//! r(n)                  = singleton(get_record(n))
//! r(id=n)               = r(n) ∪ find_by_property_equals(T, "id", "n")
//! r(id=[l,h])           = find_ids_in_range(T, l, h) ∪ find_by_property_range(T, "id", l, h)
//! r(f=v)                = find_by_property_equals(T, f, v)
//! r(f~v)                = find_by_property_prefix(T, f, v)
//! r(malformed)          = ∅
//! ```
//!
//! The store is reached through the [`Transaction`] and [`ResultSet`] traits.
//! [`MemoryStore`] is a ready-made implementation.

mod clause;
mod compile;
mod config;
mod error;
mod id;
mod memory;
mod op;
mod query;
mod traits;
mod value;

// Re-export public API
pub use clause::{Clause, ClauseKind};
pub use compile::{compile, compile_clause};
pub use config::{SearchConfig, DEFAULT_CONJUNCTION, DEFAULT_ID_FIELD};
pub use error::{Result, SeekerError};
pub use id::{LocalId, RecordId, RecordTypeId};
pub use memory::{MemoryRecord, MemoryResultSet, MemoryStore, MemoryTransaction, PropertyValue};
pub use op::Op;
pub use query::{parse, ClauseParser, DisplayQuery, Query};
pub use traits::{ResultSet, Transaction};
pub use value::Value;

use tracing::debug;

/// Parses `expression` with the default syntax and compiles it against `tx`.
///
/// Absent or blank input returns every record of `record_type`. Store errors
/// are returned unchanged; nothing about the expression itself can fail.
pub fn search<T: Transaction>(
    expression: Option<&str>,
    record_type: &str,
    record_type_id: RecordTypeId,
    tx: &T,
) -> std::result::Result<T::Results, T::Error> {
    compile(&parse(expression), record_type, record_type_id, tx)
}

/// A search entry point bound to a [`SearchConfig`].
///
/// # Example
///
/// ```
/// use entity_seeker::{MemoryStore, ResultSet, SearchConfig, Seeker};
///
/// let mut store = MemoryStore::new();
/// store.insert("Issue", [("key", "7"), ("summary", "Crash on save")]);
/// store.insert("Issue", [("key", "8"), ("summary", "Crash on load")]);
/// let issue = store.type_id("Issue").unwrap();
///
/// let seeker = Seeker::new(
///     SearchConfig::new().with_conjunction("AND").with_id_field("key"),
/// )
/// .unwrap();
///
/// let tx = store.begin();
/// let hits = seeker.search(Some("key=8 AND summary~Crash"), "Issue", issue, &tx).unwrap();
/// assert_eq!(hits.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Seeker {
    parser: ClauseParser,
}

impl Seeker {
    /// Creates a seeker, rejecting configurations it could not honor.
    pub fn new(config: SearchConfig) -> Result<Self> {
        Ok(Seeker {
            parser: ClauseParser::new(config)?,
        })
    }

    /// Returns the seeker's configuration.
    pub fn config(&self) -> &SearchConfig {
        self.parser.config()
    }

    /// Parses an expression into a query.
    pub fn parse(&self, expression: Option<&str>) -> Query {
        self.parser.parse(expression)
    }

    /// Parses `expression` and compiles it against `tx`.
    pub fn search<T: Transaction>(
        &self,
        expression: Option<&str>,
        record_type: &str,
        record_type_id: RecordTypeId,
        tx: &T,
    ) -> std::result::Result<T::Results, T::Error> {
        let query = self.parse(expression);
        debug!(query = %query.display_with(self.config().conjunction()), "parsed expression");
        compile(&query, record_type, record_type_id, tx)
    }
}
