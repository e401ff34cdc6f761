//! Per-run evaluation state: the lineage stack and the `Cached` memo table
//! (§3 `RunContext`, §4.I, §4.K).
//!
//! A `RunContext` is created once per top-level `execute` call and never
//! shared across calls. It is cheap to clone: the memo table is reference
//! counted and shared across clones (so `Cached` entries populated down one
//! branch are visible to a sibling branch reached later in the same run),
//! while the lineage stack is plain `Vec` data, so cloning it before trying
//! an `or` alternative gives that branch an independent, non-leaking
//! lineage without disturbing the shared memo table.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use fnv::FnvHashMap;

use crate::error::LineageFrame;
use crate::record::SharedRecord;
use crate::term::Term;

/// Per-`(lens, focus-term)` memo state kept by [`crate::lens::Cached`].
///
/// Keyed on the focus term directly (folding the spec's separate
/// `namedNodes`/`blankNodes` maps into one: `Term`'s `NamedNode`/`BlankNode`
/// variants already disambiguate node kind for `Eq`/`Hash`, so a single map
/// is behaviorally identical and simpler).
type CacheTable = FnvHashMap<Term, Vec<(usize, SharedRecord)>>;

#[derive(Clone)]
pub struct RunContext {
    env: Rc<HashMap<String, String>>,
    cache: Rc<RefCell<CacheTable>>,
    lineage: Vec<LineageFrame>,
}

impl RunContext {
    pub fn new(env: HashMap<String, String>) -> Self {
        Self {
            env: Rc::new(env),
            cache: Rc::new(RefCell::new(FnvHashMap::default())),
            lineage: Vec::new(),
        }
    }

    pub fn env(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    pub fn lineage_snapshot(&self) -> Vec<LineageFrame> {
        self.lineage.clone()
    }

    /// Returns a new context with `frame` pushed onto the lineage. Does not
    /// mutate `self` — used by `named()` so descendant steps see the frame
    /// while sibling branches (reached through the original context) do not.
    pub fn with_frame(&self, frame: LineageFrame) -> Self {
        let mut lineage = self.lineage.clone();
        lineage.push(frame);
        Self {
            env: self.env.clone(),
            cache: self.cache.clone(),
            lineage,
        }
    }

    /// Looks up (or reserves) the memo slot for `(lens_identity, focus)`.
    ///
    /// Returns `Some(existing)` if an entry for this exact lens identity and
    /// focus term already exists (this is what closes cycles: a re-entrant
    /// call sees the same, possibly still-empty, `SharedRecord`). Otherwise
    /// reserves a fresh empty record, registers it, and returns `None` to
    /// tell the caller it must populate it.
    pub fn cached_entry(&self, lens_identity: usize, focus: &Term) -> CacheLookup {
        let mut table = self.cache.borrow_mut();
        let entries = table.entry(focus.clone()).or_insert_with(Vec::new);
        if let Some((_, existing)) = entries.iter().find(|(id, _)| *id == lens_identity) {
            return CacheLookup::Existing(existing.clone());
        }
        let reserved = SharedRecord::empty();
        entries.push((lens_identity, reserved.clone()));
        CacheLookup::Reserved(reserved)
    }
}

pub enum CacheLookup {
    /// A prior call for this `(lens, focus)` pair is already in flight (or
    /// complete); reuse its shared record rather than re-evaluating.
    Existing(SharedRecord),
    /// No prior call; the caller now owns filling this record.
    Reserved(SharedRecord),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_frame_does_not_mutate_parent() {
        let ctx = RunContext::new(HashMap::new());
        let child = ctx.with_frame(LineageFrame::new("step"));
        assert!(ctx.lineage_snapshot().is_empty());
        assert_eq!(child.lineage_snapshot().len(), 1);
    }

    #[test]
    fn cache_shared_across_clone() {
        let ctx = RunContext::new(HashMap::new());
        let branch = ctx.with_frame(LineageFrame::new("branch"));
        let focus = Term::named("http://example.org/a");

        let reserved = match ctx.cached_entry(1, &focus) {
            CacheLookup::Reserved(r) => r,
            CacheLookup::Existing(_) => panic!("expected first lookup to reserve"),
        };
        reserved.fill({
            let mut r = crate::record::Record::new();
            r.insert("x".into(), crate::record::Value::Int(1));
            r
        });

        match branch.cached_entry(1, &focus) {
            CacheLookup::Existing(shared) => {
                assert!(shared.snapshot().contains_key("x"));
            }
            CacheLookup::Reserved(_) => panic!("expected memo hit from cloned context"),
        }
    }
}
