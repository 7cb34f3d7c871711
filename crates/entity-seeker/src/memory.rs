//! In-memory record store.
//!
//! [`MemoryStore`] implements [`Transaction`] over a sorted map of records.
//! Result sets are evaluated eagerly and iterate in [`RecordId`] order. It is
//! small enough to embed in tools and tests that need a real store behind a
//! search.
//!
//! # Example
//!
//! ```
//! use entity_seeker::{search, MemoryStore};
//!
//! let mut store = MemoryStore::new();
//! store.insert("User", [("firstName", "John"), ("lastName", "McClane")]);
//! store.insert("User", [("firstName", "Joan"), ("lastName", "Jett")]);
//! store.insert("User", [("firstName", "Holly"), ("lastName", "McClane")]);
//!
//! let user = store.type_id("User").unwrap();
//! let tx = store.begin();
//! let hits = search(Some("firstName~Jo and lastName=McClane"), "User", user, &tx).unwrap();
//!
//! let names: Vec<_> = hits
//!     .into_iter()
//!     .filter_map(|r| r.property("firstName").and_then(|v| v.as_str()).map(String::from))
//!     .collect();
//! assert_eq!(names, ["John"]);
//! ```

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

use crate::id::{LocalId, RecordId, RecordTypeId};
use crate::traits::{ResultSet, Transaction};

/// A property value held by a [`MemoryRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyValue {
    /// String property; matched by equality and prefix clauses.
    Text(String),
    /// Integer property; matched by id range clauses.
    Integer(i64),
}

impl PropertyValue {
    /// Extracts the string, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            PropertyValue::Integer(_) => None,
        }
    }

    /// Extracts the integer, if present.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(n) => Some(*n),
            PropertyValue::Text(_) => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Text(s) => write!(f, "{s}"),
            PropertyValue::Integer(n) => write!(f, "{n}"),
        }
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::Text(s)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Text(s.to_string())
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        PropertyValue::Integer(n)
    }
}

impl From<i32> for PropertyValue {
    fn from(n: i32) -> Self {
        PropertyValue::Integer(n.into())
    }
}

/// A record stored in a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRecord {
    id: RecordId,
    record_type: String,
    properties: BTreeMap<String, PropertyValue>,
}

impl MemoryRecord {
    /// Returns the record's id.
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Returns the name of the record's type.
    pub fn record_type(&self) -> &str {
        &self.record_type
    }

    /// Returns a property value by name.
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Iterates properties in name order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Returns the id of the `n`th registered type, if it fits a [`RecordTypeId`].
fn nth_type_id(n: usize) -> Option<RecordTypeId> {
    u32::try_from(n).ok().map(RecordTypeId)
}

/// Sorted, de-duplicated set of records from a [`MemoryStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryResultSet {
    records: BTreeMap<RecordId, Arc<MemoryRecord>>,
}

impl MemoryResultSet {
    /// Returns the ids in the set, in order.
    pub fn ids(&self) -> Vec<RecordId> {
        self.records.keys().copied().collect()
    }

    /// Iterates the records without consuming the set.
    pub fn iter(&self) -> impl Iterator<Item = &MemoryRecord> {
        self.records.values().map(Arc::as_ref)
    }

    /// Returns `true` if the record with `id` is in the set.
    pub fn contains(&self, id: RecordId) -> bool {
        self.records.contains_key(&id)
    }
}

impl FromIterator<Arc<MemoryRecord>> for MemoryResultSet {
    fn from_iter<I: IntoIterator<Item = Arc<MemoryRecord>>>(iter: I) -> Self {
        MemoryResultSet {
            records: iter.into_iter().map(|r| (r.id, r)).collect(),
        }
    }
}

impl IntoIterator for MemoryResultSet {
    type Item = Arc<MemoryRecord>;
    type IntoIter = btree_map::IntoValues<RecordId, Arc<MemoryRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_values()
    }
}

impl ResultSet for MemoryResultSet {
    fn empty() -> Self {
        MemoryResultSet::default()
    }

    fn union(mut self, mut other: Self) -> Self {
        self.records.append(&mut other.records);
        self
    }

    fn intersect(mut self, other: Self) -> Self {
        self.records.retain(|id, _| other.records.contains_key(id));
        self
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

/// An in-memory record store.
///
/// Record types are registered on first insert and receive increasing
/// [`RecordTypeId`]s; local ids are allocated per type starting at zero.
#[derive(Debug, Default)]
pub struct MemoryStore {
    types: BTreeMap<String, RecordTypeId>,
    next_local: BTreeMap<RecordTypeId, LocalId>,
    records: BTreeMap<RecordId, Arc<MemoryRecord>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Returns the id of a registered record type.
    pub fn type_id(&self, record_type: &str) -> Option<RecordTypeId> {
        self.types.get(record_type).copied()
    }

    /// Returns the id of `record_type`, registering it if needed.
    ///
    /// # Panics
    ///
    /// Panics if registering would exceed `u32::MAX + 1` record types, the
    /// size of the [`RecordTypeId`] space.
    pub fn register_type(&mut self, record_type: &str) -> RecordTypeId {
        if let Some(id) = self.type_id(record_type) {
            return id;
        }
        let id = nth_type_id(self.types.len()).expect("record type ids exhausted");
        self.types.insert(record_type.to_string(), id);
        id
    }

    /// Stores a new record of `record_type` and returns its id.
    pub fn insert<I, K, V>(&mut self, record_type: &str, properties: I) -> RecordId
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<PropertyValue>,
    {
        let type_id = self.register_type(record_type);
        let next = self.next_local.entry(type_id).or_insert(0);
        let id = RecordId::new(type_id, *next);
        *next += 1;

        let record = MemoryRecord {
            id,
            record_type: record_type.to_string(),
            properties: properties
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        };
        self.records.insert(id, Arc::new(record));
        id
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Starts a read-only transaction.
    pub fn begin(&self) -> MemoryTransaction<'_> {
        MemoryTransaction { store: self }
    }
}

/// Read-only view of a [`MemoryStore`].
#[derive(Debug, Clone, Copy)]
pub struct MemoryTransaction<'a> {
    store: &'a MemoryStore,
}

impl<'a> MemoryTransaction<'a> {
    fn records_in(
        &self,
        record_type: &str,
        low: LocalId,
        high: LocalId,
    ) -> impl Iterator<Item = &'a Arc<MemoryRecord>> {
        let store = self.store;
        let range = store.type_id(record_type).map(move |type_id| {
            store
                .records
                .range(RecordId::new(type_id, low)..=RecordId::new(type_id, high))
                .map(|(_, record)| record)
        });
        range.into_iter().flatten()
    }

    fn find<P>(&self, record_type: &str, field: &str, pred: P) -> MemoryResultSet
    where
        P: Fn(&PropertyValue) -> bool,
    {
        self.records_in(record_type, 0, LocalId::MAX)
            .filter(|record| record.property(field).is_some_and(&pred))
            .cloned()
            .collect()
    }
}

impl Transaction for MemoryTransaction<'_> {
    type Record = Arc<MemoryRecord>;
    type Results = MemoryResultSet;
    type Error = Infallible;

    fn all_of_type(&self, record_type: &str) -> Result<MemoryResultSet, Infallible> {
        Ok(self
            .records_in(record_type, 0, LocalId::MAX)
            .cloned()
            .collect())
    }

    fn get_record(&self, id: RecordId) -> Result<Option<Arc<MemoryRecord>>, Infallible> {
        Ok(self.store.records.get(&id).cloned())
    }

    fn singleton(&self, record: Arc<MemoryRecord>) -> Result<MemoryResultSet, Infallible> {
        Ok(std::iter::once(record).collect())
    }

    fn find_by_property_equals(
        &self,
        record_type: &str,
        field: &str,
        value: &str,
    ) -> Result<MemoryResultSet, Infallible> {
        Ok(self.find(record_type, field, |v| v.as_str() == Some(value)))
    }

    fn find_by_property_prefix(
        &self,
        record_type: &str,
        field: &str,
        prefix: &str,
    ) -> Result<MemoryResultSet, Infallible> {
        Ok(self.find(record_type, field, |v| {
            v.as_str().is_some_and(|s| s.starts_with(prefix))
        }))
    }

    fn find_ids_in_range(
        &self,
        record_type: &str,
        low: LocalId,
        high: LocalId,
    ) -> Result<MemoryResultSet, Infallible> {
        if low > high {
            return Ok(MemoryResultSet::empty());
        }
        Ok(self.records_in(record_type, low, high).cloned().collect())
    }

    fn find_by_property_range(
        &self,
        record_type: &str,
        field: &str,
        low: LocalId,
        high: LocalId,
    ) -> Result<MemoryResultSet, Infallible> {
        Ok(self.find(record_type, field, |v| {
            v.as_integer()
                .and_then(|n| LocalId::try_from(n).ok())
                .is_some_and(|n| (low..=high).contains(&n))
        }))
    }
}
