//! The dynamic record type extracted shapes produce (§9 design notes).
//!
//! Field names come from the shape graph, not from Rust types, so records
//! are a string-keyed map rather than a derived struct. [`SharedRecord`] is
//! the identity-preserving, in-place-mutable cell `Cached` (§4.I) needs to
//! close cycles: two callers that observe the same `SharedRecord` before it
//! is fully populated see the same fields once evaluation completes.

use std::fmt;
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;

use crate::lens::ArcMulti;
use crate::term::{Quad, Term};

/// An ordered, string-keyed record. Insertion order is preserved so output
/// field order matches the order shapes declare `sh:property` entries in.
pub type Record = IndexMap<String, Value>;

/// A value a field can hold: a coerced scalar, a nested record, a sequence,
/// a first-class lens (`rdfl:PathLens`), or a raw quad set (`rdfl:CBD`,
/// `rdfl:Context`).
#[derive(Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
    DateTime(chrono::DateTime<chrono::Utc>),
    Node(Term),
    Record(SharedRecord),
    List(Vec<Value>),
    /// A compiled path, stored as a callable multi-lens over containers.
    Lens(ArcMulti<crate::container::Container, crate::container::Container>),
    Quads(Vec<Quad>),
    /// The absence of an optional field (`minCount == 0`, nothing found).
    Unit,
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(n) => write!(f, "Float({n})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::DateTime(dt) => write!(f, "DateTime({dt})"),
            Value::Node(t) => write!(f, "Node({t})"),
            Value::Record(r) => write!(f, "Record({:?})", r.snapshot()),
            Value::List(items) => f.debug_list().entries(items).finish(),
            Value::Lens(_) => write!(f, "Lens(<compiled path>)"),
            Value::Quads(qs) => write!(f, "Quads({} triples)", qs.len()),
            Value::Unit => write!(f, "Unit"),
        }
    }
}

impl Value {
    pub fn as_node(&self) -> Option<&Term> {
        match self {
            Value::Node(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, Value::Unit)
    }
}

/// A reference-counted, mutably-refillable record.
///
/// `Cached` (§4.I) reserves an empty `SharedRecord`, hands clones of it to
/// every concurrent re-entrant caller, then fills it in place once the
/// wrapped lens finishes executing. Cloning a `SharedRecord` never deep
/// copies its fields — all clones observe the same underlying cell.
#[derive(Clone)]
pub struct SharedRecord(Arc<Mutex<Record>>);

impl SharedRecord {
    pub fn empty() -> Self {
        Self(Arc::new(Mutex::new(Record::new())))
    }

    pub fn from_record(record: Record) -> Self {
        Self(Arc::new(Mutex::new(record)))
    }

    /// Merges `fields` into the shared record in place. Last-wins on key
    /// conflict, matching the `TypedExtract` child-overrides-parent rule.
    pub fn fill(&self, fields: Record) {
        let mut guard = self.0.lock().expect("SharedRecord mutex poisoned");
        for (key, value) in fields {
            guard.insert(key, value);
        }
    }

    pub fn snapshot(&self) -> Record {
        self.0.lock().expect("SharedRecord mutex poisoned").clone()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn to_value(&self) -> Value {
        Value::Record(self.clone())
    }
}

impl fmt::Debug for SharedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedRecord({:?})", self.snapshot())
    }
}

/// Merges field maps left-to-right, later maps overriding earlier ones on
/// key conflict. Used by the `TypedExtract` dispatcher (§4.H step 5).
pub fn merge_records(records: impl IntoIterator<Item = Record>) -> Record {
    let mut merged = Record::new();
    for record in records {
        for (key, value) in record {
            merged.insert(key, value);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_is_observed_through_existing_clones() {
        let shared = SharedRecord::empty();
        let observer = shared.clone();
        assert!(observer.snapshot().is_empty());

        let mut fields = Record::new();
        fields.insert("x".to_string(), Value::Int(5));
        shared.fill(fields);

        assert_eq!(observer.snapshot().get("x").unwrap().as_node(), None);
        assert!(matches!(observer.snapshot().get("x"), Some(Value::Int(5))));
    }

    #[test]
    fn merge_last_wins() {
        let mut a = Record::new();
        a.insert("x".to_string(), Value::Int(1));
        let mut b = Record::new();
        b.insert("x".to_string(), Value::Int(2));
        b.insert("y".to_string(), Value::Int(3));
        let merged = merge_records([a, b]);
        assert!(matches!(merged.get("x"), Some(Value::Int(2))));
        assert!(matches!(merged.get("y"), Some(Value::Int(3))));
    }
}
