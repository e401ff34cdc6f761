//! Primitive lenses over a [`Container`] focus (§4.C).
//!
//! Every primitive here is a leaf of the combinator algebra: it inspects the
//! quad set directly rather than delegating to another lens. Everything
//! else in `crate::lens` and `crate::path` is built by composing these.

use std::collections::HashSet;
use std::sync::Arc;

use crate::container::Container;
use crate::context::RunContext;
use crate::error::LensError;
use crate::lens::multi::MultiLens;
use crate::lens::single::SingleLens;
use crate::record::Record;
use crate::term::{Quad, Term, TermRank};

/// `pred(iri)`: containers pivoted to the object of every quad whose subject
/// is the focus and whose predicate is `iri`.
pub struct Pred {
    iri: Arc<str>,
}

impl Pred {
    pub fn new(iri: impl Into<Arc<str>>) -> Self {
        Self { iri: iri.into() }
    }
}

impl MultiLens<Container<Term>, Container<Term>> for Pred {
    fn execute(
        &self,
        focus: &Container<Term>,
        _ctx: &RunContext,
    ) -> Result<Vec<Container<Term>>, LensError> {
        Ok(focus
            .quads
            .iter()
            .filter(|q| q.subject == focus.id && q.predicate.as_named() == Some(&*self.iri))
            .map(|q| focus.with_id(q.object.clone()))
            .collect())
    }
}

/// `invPred(iri)`: containers pivoted to the subject of every quad whose
/// object is the focus and whose predicate is `iri`.
pub struct InvPred {
    iri: Arc<str>,
}

impl InvPred {
    pub fn new(iri: impl Into<Arc<str>>) -> Self {
        Self { iri: iri.into() }
    }
}

impl MultiLens<Container<Term>, Container<Term>> for InvPred {
    fn execute(
        &self,
        focus: &Container<Term>,
        _ctx: &RunContext,
    ) -> Result<Vec<Container<Term>>, LensError> {
        Ok(focus
            .quads
            .iter()
            .filter(|q| q.object == focus.id && q.predicate.as_named() == Some(&*self.iri))
            .map(|q| focus.with_id(q.subject.clone()))
            .collect())
    }
}

/// `predTriple(iri)`: like [`Pred`], but pivots to the whole matching quad
/// rather than just its object — used where a step needs the predicate or
/// graph alongside the value (e.g. `rdfl:Context`).
pub struct PredTriple {
    iri: Arc<str>,
}

impl PredTriple {
    pub fn new(iri: impl Into<Arc<str>>) -> Self {
        Self { iri: iri.into() }
    }
}

impl MultiLens<Container<Term>, Container<Quad>> for PredTriple {
    fn execute(
        &self,
        focus: &Container<Term>,
        _ctx: &RunContext,
    ) -> Result<Vec<Container<Quad>>, LensError> {
        Ok(focus
            .quads
            .iter()
            .filter(|q| q.subject == focus.id && q.predicate.as_named() == Some(&*self.iri))
            .map(|q| focus.with_id(q.clone()))
            .collect())
    }
}

/// A single slot of a `match()` pattern: fixed to a term, or left open.
pub enum Slot {
    Any,
    Term(Term),
}

/// `match(s?, p?, o?)`: quads matching the given pattern against the
/// container's full quad set (not scoped to the focus subject).
pub struct Match {
    subject: Slot,
    predicate: Slot,
    object: Slot,
}

impl Match {
    pub fn new(subject: Slot, predicate: Slot, object: Slot) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    fn slot_matches(slot: &Slot, term: &Term) -> bool {
        match slot {
            Slot::Any => true,
            Slot::Term(expected) => expected == term,
        }
    }
}

impl MultiLens<Container<Term>, Container<Quad>> for Match {
    fn execute(
        &self,
        focus: &Container<Term>,
        _ctx: &RunContext,
    ) -> Result<Vec<Container<Quad>>, LensError> {
        Ok(focus
            .quads
            .iter()
            .filter(|q| {
                Self::slot_matches(&self.subject, &q.subject)
                    && Self::slot_matches(&self.predicate, &q.predicate)
                    && Self::slot_matches(&self.object, &q.object)
            })
            .map(|q| focus.with_id(q.clone()))
            .collect())
    }
}

/// `subjects()`: a container for every distinct subject term in the quad set.
pub struct Subjects;

impl MultiLens<Container<Term>, Container<Term>> for Subjects {
    fn execute(
        &self,
        focus: &Container<Term>,
        _ctx: &RunContext,
    ) -> Result<Vec<Container<Term>>, LensError> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for q in focus.quads.iter() {
            if seen.insert(q.subject.clone()) {
                out.push(focus.with_id(q.subject.clone()));
            }
        }
        Ok(out)
    }
}

/// `unique()`: deduplicates a multi-lens' output by focus-term identity,
/// ordering literals before named nodes before blank nodes (`Term::rank`).
///
/// Modelled as a combinator over an existing [`MultiLens`] rather than a
/// zero-argument primitive constructor: `unique` only makes sense applied to
/// a sequence, so `Const.unique()` mirrors `thenAll`/`thenFlat` rather than
/// standing alongside `pred`/`subjects` as its own leaf.
pub struct Unique<L> {
    inner: L,
}

impl<L> Unique<L> {
    pub fn new(inner: L) -> Self {
        Self { inner }
    }
}

impl<L> MultiLens<Container<Term>, Container<Term>> for Unique<L>
where
    L: MultiLens<Container<Term>, Container<Term>>,
{
    fn execute(
        &self,
        focus: &Container<Term>,
        ctx: &RunContext,
    ) -> Result<Vec<Container<Term>>, LensError> {
        let mut items = self.inner.execute(focus, ctx)?;
        items.sort_by(|a, b| a.id.rank().cmp(&b.id.rank()).then_with(|| a.id.value().cmp(b.id.value())));
        let mut seen = HashSet::new();
        items.retain(|c| seen.insert(c.id.clone()));
        Ok(items)
    }
}

pub trait UniqueExt: MultiLens<Container<Term>, Container<Term>> + Sized {
    fn unique(self) -> Unique<Self> {
        Unique::new(self)
    }
}

impl<L: MultiLens<Container<Term>, Container<Term>>> UniqueExt for L {}

/// `subject()`: pivots a quad-focused container to its subject term.
pub struct SubjectOf;

impl SingleLens<Container<Quad>, Container<Term>> for SubjectOf {
    fn execute(&self, focus: &Container<Quad>, _ctx: &RunContext) -> Result<Container<Term>, LensError> {
        Ok(focus.with_id(focus.id.subject.clone()))
    }
}

/// `predicate()`: pivots a quad-focused container to its predicate term.
pub struct PredicateOf;

impl SingleLens<Container<Quad>, Container<Term>> for PredicateOf {
    fn execute(&self, focus: &Container<Quad>, _ctx: &RunContext) -> Result<Container<Term>, LensError> {
        Ok(focus.with_id(focus.id.predicate.clone()))
    }
}

/// `object()`: pivots a quad-focused container to its object term.
pub struct ObjectOf;

impl SingleLens<Container<Quad>, Container<Term>> for ObjectOf {
    fn execute(&self, focus: &Container<Quad>, _ctx: &RunContext) -> Result<Container<Term>, LensError> {
        Ok(focus.with_id(focus.id.object.clone()))
    }
}

/// `empty()`: always produces an empty record, ignoring the focus. Used as
/// the neutral element for `and()` compositions and as the base case `reduce`
/// folds from.
pub struct Empty;

impl<C> SingleLens<C, Record> for Empty {
    fn execute(&self, _focus: &C, _ctx: &RunContext) -> Result<Record, LensError> {
        Ok(Record::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn quads() -> Vec<Quad> {
        vec![
            Quad::new(Term::named("s"), Term::named("p"), Term::named("o1")),
            Quad::new(Term::named("s"), Term::named("p"), Term::named("o2")),
            Quad::new(Term::named("s"), Term::named("other"), Term::named("o3")),
        ]
    }

    #[test]
    fn pred_filters_by_subject_and_predicate() {
        let container = Container::root(Term::named("s"), quads());
        let ctx = RunContext::new(HashMap::new());
        let results = Pred::new("p").execute(&container, &ctx).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, Term::named("o1"));
    }

    #[test]
    fn inv_pred_reverses_direction() {
        let container = Container::root(Term::named("o1"), quads());
        let ctx = RunContext::new(HashMap::new());
        let results = InvPred::new("p").execute(&container, &ctx).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, Term::named("s"));
    }

    #[test]
    fn unique_dedups_by_term_identity() {
        let qs = vec![
            Quad::new(Term::named("s"), Term::named("p"), Term::named("o1")),
            Quad::new(Term::named("s"), Term::named("p"), Term::named("o1")),
        ];
        let container = Container::root(Term::named("s"), qs);
        let ctx = RunContext::new(HashMap::new());
        let results = Pred::new("p").unique().execute(&container, &ctx).unwrap();
        assert_eq!(results.len(), 1);
    }
}
