//! Query compilation.
//!
//! Each clause becomes one result set built from one or two primitive store
//! calls; the clause results are then intersected in clause order.
//!
//! | Clause | Store calls |
//! |--------|-------------|
//! | `MalformedId`, `MalformedClause` | none, [`ResultSet::empty`] |
//! | `IdLookup(n)` | `get_record`, then `singleton` if found |
//! | `IdEqualsMatch(n)` | `IdLookup(n)` ∪ `find_by_property_equals(field, "n")` |
//! | `IdRangeMatch(l, h)` | `find_ids_in_range` ∪ `find_by_property_range(field)` |
//! | `FieldEquals` | `find_by_property_equals` |
//! | `FieldPrefix` | `find_by_property_prefix` |

use tracing::{debug, trace};

use crate::clause::Clause;
use crate::id::{RecordId, RecordTypeId};
use crate::query::Query;
use crate::traits::{ResultSet, Transaction};

/// Compiles a parsed query against a transaction.
///
/// An empty query returns every record of `record_type`. A single clause
/// returns that clause's result as is; more clauses are folded left to right
/// with [`ResultSet::intersect`]. Store errors are returned unchanged.
pub fn compile<T: Transaction>(
    query: &Query,
    record_type: &str,
    record_type_id: RecordTypeId,
    tx: &T,
) -> Result<T::Results, T::Error> {
    debug!(record_type, %record_type_id, clauses = query.len(), "compiling query");

    let mut clauses = query.iter();
    let Some(first) = clauses.next() else {
        return tx.all_of_type(record_type);
    };

    let mut results = compile_clause(first, record_type, record_type_id, tx)?;
    for clause in clauses {
        let next = compile_clause(clause, record_type, record_type_id, tx)?;
        results = results.intersect(next);
    }
    Ok(results)
}

/// Compiles one clause into its result set.
pub fn compile_clause<T: Transaction>(
    clause: &Clause,
    record_type: &str,
    record_type_id: RecordTypeId,
    tx: &T,
) -> Result<T::Results, T::Error> {
    trace!(kind = %clause.kind(), %clause, "compiling clause");

    match clause {
        Clause::MalformedId(_) | Clause::MalformedClause(_) => Ok(T::Results::empty()),
        Clause::IdLookup(id) => lookup(tx, RecordId::new(record_type_id, *id)),
        Clause::IdEqualsMatch { field, id } => {
            let by_id = lookup(tx, RecordId::new(record_type_id, *id))?;
            let by_property = tx.find_by_property_equals(record_type, field, &id.to_string())?;
            Ok(by_id.union(by_property))
        }
        Clause::IdRangeMatch { field, low, high } => {
            let by_id = tx.find_ids_in_range(record_type, *low, *high)?;
            let by_property = tx.find_by_property_range(record_type, field, *low, *high)?;
            Ok(by_id.union(by_property))
        }
        Clause::FieldEquals { field, value } => {
            tx.find_by_property_equals(record_type, field, value)
        }
        Clause::FieldPrefix { field, value } => {
            tx.find_by_property_prefix(record_type, field, value)
        }
    }
}

fn lookup<T: Transaction>(tx: &T, id: RecordId) -> Result<T::Results, T::Error> {
    match tx.get_record(id)? {
        Some(record) => tx.singleton(record),
        None => {
            trace!(%id, "no record for id");
            Ok(T::Results::empty())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::query::parse;

    fn store() -> (MemoryStore, RecordTypeId) {
        let mut store = MemoryStore::new();
        store.insert("User", [("name", "Ann"), ("id", "1")]);
        store.insert("User", [("name", "Bob")]);
        store.insert("User", [("name", "Anita")]);
        let user = store.type_id("User").unwrap();
        (store, user)
    }

    fn local_ids(store: &MemoryStore, user: RecordTypeId, term: &str) -> Vec<u64> {
        let tx = store.begin();
        compile(&parse(Some(term)), "User", user, &tx)
            .unwrap()
            .ids()
            .into_iter()
            .map(|id| id.local_id())
            .collect()
    }

    #[test]
    fn empty_query_is_all_of_type() {
        let (store, user) = store();
        let tx = store.begin();
        let all = compile(&Query::new(), "User", user, &tx).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn malformed_clause_is_empty() {
        let (store, user) = store();
        let tx = store.begin();
        let clause = Clause::MalformedClause("=x".into());
        assert!(compile_clause(&clause, "User", user, &tx)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn id_equality_unions_lookup_and_property() {
        let (store, user) = store();
        // Record 1 by local id, record 0 by its "id" property.
        assert_eq!(local_ids(&store, user, "id=1"), [0, 1]);
        assert_eq!(local_ids(&store, user, "1"), [1]);
    }

    #[test]
    fn range_and_prefix() {
        let (store, user) = store();
        assert_eq!(local_ids(&store, user, "id=[1,2]"), [1, 2]);
        assert_eq!(local_ids(&store, user, "name~An"), [0, 2]);
        assert_eq!(local_ids(&store, user, "name~An and id=[1,5]"), [2]);
    }

    #[test]
    fn lookup_outside_type_is_empty() {
        let (store, user) = store();
        assert!(local_ids(&store, user, "3").is_empty());
        assert!(local_ids(&store, RecordTypeId(9), "0").is_empty());
    }
}
