//! Store capability traits.
//!
//! Seeker never owns records. It composes result sets handed out by a
//! [`Transaction`], so any store that can answer the primitive lookups below
//! and combine its own result sets can be searched.

use crate::id::{LocalId, RecordId};

/// A possibly lazy, ordered set of records.
///
/// Implementations decide when evaluation happens; the compiler only
/// combines handles with [`union`](ResultSet::union) and
/// [`intersect`](ResultSet::intersect).
///
/// # Example
///
/// ```
/// use entity_seeker::ResultSet;
///
/// #[derive(Debug, PartialEq)]
/// struct Ids(Vec<u64>);
///
/// impl IntoIterator for Ids {
///     type Item = u64;
///     type IntoIter = std::vec::IntoIter<u64>;
///     fn into_iter(self) -> Self::IntoIter {
///         self.0.into_iter()
///     }
/// }
///
/// impl ResultSet for Ids {
///     fn empty() -> Self {
///         Ids(Vec::new())
///     }
///     fn union(mut self, other: Self) -> Self {
///         self.0.extend(other.0);
///         self.0.sort();
///         self.0.dedup();
///         self
///     }
///     fn intersect(mut self, other: Self) -> Self {
///         self.0.retain(|id| other.0.contains(id));
///         self
///     }
///     fn len(&self) -> usize {
///         self.0.len()
///     }
/// }
///
/// let both = Ids(vec![1, 2]).intersect(Ids(vec![2, 3]));
/// assert_eq!(both, Ids(vec![2]));
/// assert!(Ids::empty().intersect(Ids(vec![1])).is_empty());
/// ```
pub trait ResultSet: IntoIterator + Sized {
    /// Returns a set with no records, built without touching any store.
    fn empty() -> Self;

    /// Records in `self` or in `other`.
    fn union(self, other: Self) -> Self;

    /// Records in both `self` and `other`.
    fn intersect(self, other: Self) -> Self;

    /// Number of records. May force evaluation.
    fn len(&self) -> usize;

    /// Returns `true` if the set has no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read access to a record store within one transaction.
///
/// Every method only reads. Failures are reported through the store's own
/// [`Error`](Transaction::Error) type, which the compiler passes through
/// unchanged.
///
/// Range bounds are inclusive on both ends.
pub trait Transaction {
    /// A stored record.
    type Record;

    /// The store's result set type.
    type Results: ResultSet<Item = Self::Record>;

    /// Store-level failure.
    type Error;

    /// All records of `record_type`.
    fn all_of_type(&self, record_type: &str) -> Result<Self::Results, Self::Error>;

    /// The record with `id`, if it exists.
    fn get_record(&self, id: RecordId) -> Result<Option<Self::Record>, Self::Error>;

    /// A one-element set holding `record`.
    fn singleton(&self, record: Self::Record) -> Result<Self::Results, Self::Error>;

    /// Records of `record_type` whose `field` property equals `value`.
    fn find_by_property_equals(
        &self,
        record_type: &str,
        field: &str,
        value: &str,
    ) -> Result<Self::Results, Self::Error>;

    /// Records of `record_type` whose `field` property starts with `prefix`.
    fn find_by_property_prefix(
        &self,
        record_type: &str,
        field: &str,
        prefix: &str,
    ) -> Result<Self::Results, Self::Error>;

    /// Records of `record_type` whose local id is within `low..=high`.
    fn find_ids_in_range(
        &self,
        record_type: &str,
        low: LocalId,
        high: LocalId,
    ) -> Result<Self::Results, Self::Error>;

    /// Records of `record_type` whose integer `field` property is within
    /// `low..=high`.
    fn find_by_property_range(
        &self,
        record_type: &str,
        field: &str,
        low: LocalId,
        high: LocalId,
    ) -> Result<Self::Results, Self::Error>;
}
