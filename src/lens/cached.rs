//! Identity-preserving memoization for cycle-safety (§4.I).
//!
//! RDF graphs can contain cycles (`a ex:friend b . b ex:friend a .`). Without
//! memoization, extracting `a` would recurse into `b` which recurses back
//! into `a` forever. `Cached` breaks the cycle: the first call for a given
//! `(lens, focus)` pair reserves an empty, shared, mutable record and hands
//! that same record to every re-entrant call reached before the first call
//! finishes. A cyclic reference therefore resolves to the same (possibly
//! still-filling-in) record rather than looping.

use crate::context::{CacheLookup, RunContext};
use crate::error::LensError;
use crate::lens::single::SingleLens;
use crate::record::{Record, SharedRecord, Value};
use crate::term::Term;

/// Wraps a `SingleLens<Container<Term>, Record>`-shaped lens (or anything
/// keyed by a [`Term`] focus) with cycle-safe memoization.
pub struct Cached<C, L> {
    inner: L,
    _marker: std::marker::PhantomData<fn() -> C>,
}

impl<C, L> Cached<C, L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            _marker: std::marker::PhantomData,
        }
    }

    /// Pointer identity of this wrapper, stable for its lifetime since
    /// callers hold it behind an `Arc`. Deliberately not a process-wide
    /// monotonic counter — that would make two `Cached` instances wrapping
    /// structurally identical lenses collide, or worse, make cache keys
    /// depend on construction order.
    fn identity(&self) -> usize {
        self as *const Self as usize
    }
}

/// A focus type that can be reduced to the [`Term`] a cache entry is keyed
/// on. `Container<Term>` keys on its own id; callers needing a different key
/// shape provide their own impl.
pub trait CacheKey {
    fn cache_key(&self) -> &Term;
}

impl CacheKey for crate::container::Container<Term> {
    fn cache_key(&self) -> &Term {
        &self.id
    }
}

impl<C, L> SingleLens<C, Value> for Cached<C, L>
where
    C: CacheKey + Send + Sync,
    L: SingleLens<C, Record>,
{
    fn execute(&self, focus: &C, ctx: &RunContext) -> Result<Value, LensError> {
        let key = focus.cache_key().clone();
        match ctx.cached_entry(self.identity(), &key) {
            CacheLookup::Existing(shared) => Ok(shared.to_value()),
            CacheLookup::Reserved(shared) => {
                let fields = self.inner.execute(focus, ctx)?;
                shared.fill(fields);
                Ok(shared.to_value())
            }
        }
    }
}

/// Exposes the reserved-but-unfilled case directly, for callers (the shape
/// compiler) that need the [`SharedRecord`] handle rather than a `Value`.
pub fn cached_record<C, L>(
    cached: &Cached<C, L>,
    focus: &C,
    ctx: &RunContext,
) -> Result<SharedRecord, LensError>
where
    C: CacheKey + Send + Sync,
    L: SingleLens<C, Record>,
{
    let key = focus.cache_key().clone();
    match ctx.cached_entry(cached.identity(), &key) {
        CacheLookup::Existing(shared) => Ok(shared),
        CacheLookup::Reserved(shared) => {
            let fields = cached.inner.execute(focus, ctx)?;
            shared.fill(fields);
            Ok(shared)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Container;
    use std::cell::Cell;
    use std::collections::HashMap;
    use std::rc::Rc;

    struct CountingRecord(Rc<Cell<u32>>);

    impl SingleLens<Container<Term>, Record> for CountingRecord {
        fn execute(&self, focus: &Container<Term>, _ctx: &RunContext) -> Result<Record, LensError> {
            self.0.set(self.0.get() + 1);
            let mut r = Record::new();
            r.insert("id".into(), Value::Node(focus.id.clone()));
            Ok(r)
        }
    }

    #[test]
    fn repeated_focus_evaluates_inner_lens_once() {
        let calls = Rc::new(Cell::new(0));
        let cached = Cached::new(CountingRecord(calls.clone()));
        let ctx = RunContext::new(HashMap::new());
        let container = Container::root(Term::named("a"), vec![]);

        cached.execute(&container, &ctx).unwrap();
        cached.execute(&container, &ctx).unwrap();

        assert_eq!(calls.get(), 1);
    }
}
