//! Store-call tests for search.
//!
//! The recording transaction below returns symbolic result sets, so each test
//! can assert both which store calls a search made and how their results were
//! combined.

use std::cell::RefCell;
use std::collections::HashSet;

use entity_seeker::{
    compile, parse, search, Clause, LocalId, Query, RecordId, RecordTypeId, ResultSet,
    SearchConfig, Seeker, Transaction,
};

const TYPE_ID: RecordTypeId = RecordTypeId(0);
const TYPE_NAME: &str = "type";

// ============================================================================
// Recording transaction
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Plan {
    Empty,
    All(String),
    Singleton(RecordId),
    Equals(String, String, String),
    Prefix(String, String, String),
    IdRange(String, LocalId, LocalId),
    PropertyRange(String, String, LocalId, LocalId),
    Union(Box<Plan>, Box<Plan>),
    Intersect(Box<Plan>, Box<Plan>),
}

impl IntoIterator for Plan {
    type Item = RecordId;
    type IntoIter = std::vec::IntoIter<RecordId>;

    fn into_iter(self) -> Self::IntoIter {
        match self {
            Plan::Singleton(id) => vec![id].into_iter(),
            _ => Vec::new().into_iter(),
        }
    }
}

impl ResultSet for Plan {
    fn empty() -> Self {
        Plan::Empty
    }

    fn union(self, other: Self) -> Self {
        Plan::Union(Box::new(self), Box::new(other))
    }

    fn intersect(self, other: Self) -> Self {
        Plan::Intersect(Box::new(self), Box::new(other))
    }

    fn len(&self) -> usize {
        match self {
            Plan::Empty => 0,
            Plan::Union(a, b) => a.len() + b.len(),
            Plan::Intersect(a, b) => a.len().min(b.len()),
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    AllOfType(String),
    GetRecord(RecordId),
    Singleton(RecordId),
    FindEquals(String, String, String),
    FindPrefix(String, String, String),
    FindIds(String, LocalId, LocalId),
    FindRange(String, String, LocalId, LocalId),
}

#[derive(Debug, PartialEq, Eq)]
struct StoreDown;

#[derive(Default)]
struct RecordingTx {
    calls: RefCell<Vec<Call>>,
    records: HashSet<RecordId>,
    fail_finds: bool,
}

impl RecordingTx {
    fn new() -> Self {
        RecordingTx::default()
    }

    fn with_record(mut self, local_id: LocalId) -> Self {
        self.records.insert(RecordId::new(TYPE_ID, local_id));
        self
    }

    fn failing() -> Self {
        RecordingTx {
            fail_finds: true,
            ..RecordingTx::default()
        }
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn check(&self) -> Result<(), StoreDown> {
        if self.fail_finds {
            Err(StoreDown)
        } else {
            Ok(())
        }
    }
}

impl Transaction for RecordingTx {
    type Record = RecordId;
    type Results = Plan;
    type Error = StoreDown;

    fn all_of_type(&self, record_type: &str) -> Result<Plan, StoreDown> {
        self.record(Call::AllOfType(record_type.into()));
        Ok(Plan::All(record_type.into()))
    }

    fn get_record(&self, id: RecordId) -> Result<Option<RecordId>, StoreDown> {
        self.record(Call::GetRecord(id));
        Ok(self.records.get(&id).copied())
    }

    fn singleton(&self, record: RecordId) -> Result<Plan, StoreDown> {
        self.record(Call::Singleton(record));
        Ok(Plan::Singleton(record))
    }

    fn find_by_property_equals(
        &self,
        record_type: &str,
        field: &str,
        value: &str,
    ) -> Result<Plan, StoreDown> {
        self.record(Call::FindEquals(record_type.into(), field.into(), value.into()));
        self.check()?;
        Ok(Plan::Equals(record_type.into(), field.into(), value.into()))
    }

    fn find_by_property_prefix(
        &self,
        record_type: &str,
        field: &str,
        prefix: &str,
    ) -> Result<Plan, StoreDown> {
        self.record(Call::FindPrefix(record_type.into(), field.into(), prefix.into()));
        self.check()?;
        Ok(Plan::Prefix(record_type.into(), field.into(), prefix.into()))
    }

    fn find_ids_in_range(
        &self,
        record_type: &str,
        low: LocalId,
        high: LocalId,
    ) -> Result<Plan, StoreDown> {
        self.record(Call::FindIds(record_type.into(), low, high));
        self.check()?;
        Ok(Plan::IdRange(record_type.into(), low, high))
    }

    fn find_by_property_range(
        &self,
        record_type: &str,
        field: &str,
        low: LocalId,
        high: LocalId,
    ) -> Result<Plan, StoreDown> {
        self.record(Call::FindRange(record_type.into(), field.into(), low, high));
        self.check()?;
        Ok(Plan::PropertyRange(record_type.into(), field.into(), low, high))
    }
}

fn run(tx: &RecordingTx, term: Option<&str>) -> Plan {
    search(term, TYPE_NAME, TYPE_ID, tx).unwrap()
}

fn id(local_id: LocalId) -> RecordId {
    RecordId::new(TYPE_ID, local_id)
}

fn union(a: Plan, b: Plan) -> Plan {
    Plan::Union(Box::new(a), Box::new(b))
}

fn intersect(a: Plan, b: Plan) -> Plan {
    Plan::Intersect(Box::new(a), Box::new(b))
}

fn equals(field: &str, value: &str) -> Plan {
    Plan::Equals(TYPE_NAME.into(), field.into(), value.into())
}

fn prefix(field: &str, value: &str) -> Plan {
    Plan::Prefix(TYPE_NAME.into(), field.into(), value.into())
}

// ============================================================================
// Empty expressions
// ============================================================================

#[test]
fn search_all() {
    for term in [None, Some(""), Some("   ")] {
        let tx = RecordingTx::new();
        assert_eq!(run(&tx, term), Plan::All(TYPE_NAME.into()));
        assert_eq!(tx.calls(), [Call::AllOfType(TYPE_NAME.into())]);
    }
}

// ============================================================================
// Bare ids
// ============================================================================

#[test]
fn simple_id_search() {
    let tx = RecordingTx::new().with_record(1);

    assert_eq!(run(&tx, Some("1")), Plan::Singleton(id(1)));
    assert_eq!(tx.calls(), [Call::GetRecord(id(1)), Call::Singleton(id(1))]);
}

#[test]
fn missing_id_is_empty_not_an_error() {
    let tx = RecordingTx::new();

    let result = run(&tx, Some("5"));
    assert_eq!(result, Plan::Empty);
    assert!(result.is_empty());
    assert_eq!(tx.calls(), [Call::GetRecord(id(5))]);
}

#[test]
fn wrong_id_search() {
    for term in ["1x", "-1", "+1", "x", "1 2", "99999999999999999999"] {
        let tx = RecordingTx::new().with_record(1);

        let result = run(&tx, Some(term));
        assert_eq!(result.len(), 0, "{term:?}");
        assert!(tx.calls().is_empty(), "{term:?} reached the store");
    }
}

// ============================================================================
// Id field
// ============================================================================

#[test]
fn search_by_id_param() {
    let tx = RecordingTx::new().with_record(1);

    let result = run(&tx, Some("id=1"));
    assert_eq!(result, union(Plan::Singleton(id(1)), equals("id", "1")));
    assert_eq!(
        tx.calls(),
        [
            Call::GetRecord(id(1)),
            Call::Singleton(id(1)),
            Call::FindEquals(TYPE_NAME.into(), "id".into(), "1".into()),
        ]
    );
}

#[test]
fn id_param_keeps_both_legs_when_record_is_missing() {
    let tx = RecordingTx::new();

    let result = run(&tx, Some("id=3"));
    assert_eq!(result, union(Plan::Empty, equals("id", "3")));
    assert_eq!(
        tx.calls(),
        [
            Call::GetRecord(id(3)),
            Call::FindEquals(TYPE_NAME.into(), "id".into(), "3".into()),
        ]
    );
}

#[test]
fn search_by_id_range() {
    let tx = RecordingTx::new();

    let result = run(&tx, Some("id=[1,10]"));
    assert_eq!(
        result,
        union(
            Plan::IdRange(TYPE_NAME.into(), 1, 10),
            Plan::PropertyRange(TYPE_NAME.into(), "id".into(), 1, 10),
        )
    );
    assert_eq!(
        tx.calls(),
        [
            Call::FindIds(TYPE_NAME.into(), 1, 10),
            Call::FindRange(TYPE_NAME.into(), "id".into(), 1, 10),
        ]
    );
}

#[test]
fn malformed_id_values_never_reach_the_store() {
    for term in ["id=[10,1]", "id=[1,x]", "id=-4", "id=[1, 2]"] {
        let tx = RecordingTx::new();
        assert_eq!(run(&tx, Some(term)), Plan::Empty, "{term:?}");
        assert!(tx.calls().is_empty(), "{term:?} reached the store");
    }
}

#[test]
fn non_numeric_id_is_a_plain_property() {
    let tx = RecordingTx::new();

    assert_eq!(run(&tx, Some("id=abc")), equals("id", "abc"));
    assert_eq!(
        tx.calls(),
        [Call::FindEquals(TYPE_NAME.into(), "id".into(), "abc".into())]
    );
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn search_by_like() {
    let tx = RecordingTx::new();

    assert_eq!(run(&tx, Some("firstName~Jo")), prefix("firstName", "Jo"));
    assert_eq!(
        tx.calls(),
        [Call::FindPrefix(TYPE_NAME.into(), "firstName".into(), "Jo".into())]
    );
}

#[test]
fn search_by_equality() {
    let tx = RecordingTx::new();

    assert_eq!(run(&tx, Some("lastName=McClane")), equals("lastName", "McClane"));
    assert_eq!(tx.calls().len(), 1);
}

#[test]
fn malformed_clause_never_reaches_the_store() {
    for term in ["=McClane", "~Jo", "=", "=a~b"] {
        let tx = RecordingTx::new();
        assert_eq!(run(&tx, Some(term)), Plan::Empty, "{term:?}");
        assert!(tx.calls().is_empty());
    }
}

#[test]
fn empty_value_searches_for_the_empty_string() {
    let tx = RecordingTx::new();

    assert_eq!(run(&tx, Some("lastName=")), equals("lastName", ""));
    assert_eq!(
        tx.calls(),
        [Call::FindEquals(TYPE_NAME.into(), "lastName".into(), "".into())]
    );
}

#[test]
fn equality_is_tested_before_prefix() {
    let tx = RecordingTx::new();

    assert_eq!(run(&tx, Some("~x=y")), equals("~x", "y"));
    assert_eq!(
        tx.calls(),
        [Call::FindEquals(TYPE_NAME.into(), "~x".into(), "y".into())]
    );
}

// ============================================================================
// Conjunction
// ============================================================================

#[test]
fn search_by_params() {
    let tx = RecordingTx::new();

    let result = run(&tx, Some("firstName~Jo and lastName=McClane"));
    assert_eq!(
        result,
        intersect(prefix("firstName", "Jo"), equals("lastName", "McClane"))
    );
    assert_eq!(
        tx.calls(),
        [
            Call::FindPrefix(TYPE_NAME.into(), "firstName".into(), "Jo".into()),
            Call::FindEquals(TYPE_NAME.into(), "lastName".into(), "McClane".into()),
        ]
    );
}

#[test]
fn intersection_folds_left_in_clause_order() {
    let tx = RecordingTx::new().with_record(7);

    let result = run(&tx, Some("a=1 and b~2 and 7"));
    assert_eq!(
        result,
        intersect(
            intersect(equals("a", "1"), prefix("b", "2")),
            Plan::Singleton(id(7)),
        )
    );
}

#[test]
fn swapped_clauses_swap_call_order_only() {
    let tx = RecordingTx::new();
    let swapped = run(&tx, Some("lastName=McClane and firstName~Jo"));

    assert_eq!(
        swapped,
        intersect(equals("lastName", "McClane"), prefix("firstName", "Jo"))
    );
    assert_eq!(
        tx.calls(),
        [
            Call::FindEquals(TYPE_NAME.into(), "lastName".into(), "McClane".into()),
            Call::FindPrefix(TYPE_NAME.into(), "firstName".into(), "Jo".into()),
        ]
    );
}

#[test]
fn malformed_clause_narrows_the_whole_conjunction() {
    let tx = RecordingTx::new();

    let result = run(&tx, Some("lastName=McClane and 1x"));
    assert_eq!(result, intersect(equals("lastName", "McClane"), Plan::Empty));
    assert_eq!(result.len(), 0);
    assert_eq!(tx.calls().len(), 1);
}

// ============================================================================
// Errors and entry points
// ============================================================================

#[test]
fn store_errors_pass_through() {
    let tx = RecordingTx::failing();

    let err = search(Some("1x and lastName=McClane and a~b"), TYPE_NAME, TYPE_ID, &tx);
    assert_eq!(err, Err(StoreDown));
    // Compilation stops at the first failing call.
    assert_eq!(tx.calls().len(), 1);
}

#[test]
fn compile_accepts_hand_built_queries() {
    let tx = RecordingTx::new();
    let query = Query::new()
        .and(Clause::FieldEquals {
            field: "a".into(),
            value: "1".into(),
        })
        .and(Clause::IdRangeMatch {
            field: "key".into(),
            low: 2,
            high: 3,
        });

    let result = compile(&query, TYPE_NAME, TYPE_ID, &tx).unwrap();
    assert_eq!(
        result,
        intersect(
            equals("a", "1"),
            union(
                Plan::IdRange(TYPE_NAME.into(), 2, 3),
                Plan::PropertyRange(TYPE_NAME.into(), "key".into(), 2, 3),
            ),
        )
    );
    assert_eq!(query, parse(Some("a=1")).and(query.clauses()[1].clone()));
}

#[test]
fn seeker_uses_its_config() {
    let tx = RecordingTx::new();
    let seeker = Seeker::new(
        SearchConfig::new()
            .with_conjunction("&&")
            .with_id_field("key"),
    )
    .unwrap();

    let result = seeker
        .search(Some("key=4 && id=4"), TYPE_NAME, TYPE_ID, &tx)
        .unwrap();
    assert_eq!(
        result,
        intersect(union(Plan::Empty, equals("key", "4")), equals("id", "4"))
    );
    assert_eq!(seeker.config().id_field(), "key");
}

#[test]
fn repeated_searches_make_the_same_calls() {
    let tx = RecordingTx::new().with_record(2);
    let term = Some("id=2 and name~A");

    let first = run(&tx, term);
    let first_calls = tx.calls();
    tx.calls.borrow_mut().clear();
    let second = run(&tx, term);

    assert_eq!(first, second);
    assert_eq!(first_calls, tx.calls());
}
