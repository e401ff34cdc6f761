//! SHACL property path compilation (§4.E).
//!
//! `sh:path` values are themselves small RDF graphs: a bare IRI is a
//! predicate path, a blank node carries exactly one of
//! `sh:inversePath`/`sh:alternativePath`/`sh:zeroOrMorePath`/
//! `sh:oneOrMorePath`/`sh:zeroOrOnePath`, and an RDF list node is a sequence
//! path. [`compile_path`] dispatches on this shape structurally (there is no
//! separate `rdf:type` tag distinguishing path kinds — see `SPEC_FULL.md`
//! Open Question #1) and produces a single compiled [`MultiLens`].

use std::collections::HashSet;
use std::sync::Arc;

use crate::container::Container;
use crate::context::RunContext;
use crate::error::{ErrorKind, LensError};
use crate::lens::{ArcMulti, MultiLens, Pred};
use crate::rdf_list::decode_list;
use crate::term::Term;
use crate::vocab::{rdf, sh};

/// Compiles a `sh:path` node into a callable multi-lens over containers.
pub fn compile_path(path_node: &Container<Term>) -> Result<ArcMulti<Container<Term>, Container<Term>>, LensError> {
    if let Term::NamedNode(iri) = &path_node.id {
        return Ok(Arc::new(Pred::new(iri.clone())));
    }

    let inverse = single_object(path_node, sh::INVERSE_PATH)?;
    if let Some(inner) = inverse {
        let compiled = compile_path(&path_node.with_id(inner))?;
        return Ok(Arc::new(InversePath::new(compiled)));
    }

    let alternative = single_object(path_node, sh::ALTERNATIVE_PATH)?;
    if let Some(list_head) = alternative {
        let members = decode_list(&path_node.with_id(list_head))?;
        let compiled: Result<Vec<_>, _> = members.iter().map(compile_path).collect();
        return Ok(Arc::new(crate::lens::OrAll::new(compiled?)));
    }

    if let Some(inner) = single_object(path_node, sh::ZERO_OR_MORE_PATH)? {
        let compiled = compile_path(&path_node.with_id(inner))?;
        return Ok(Arc::new(Closure::new(compiled, true)));
    }
    if let Some(inner) = single_object(path_node, sh::ONE_OR_MORE_PATH)? {
        let compiled = compile_path(&path_node.with_id(inner))?;
        return Ok(Arc::new(Closure::new(compiled, false)));
    }
    if let Some(inner) = single_object(path_node, sh::ZERO_OR_ONE_PATH)? {
        let compiled = compile_path(&path_node.with_id(inner))?;
        return Ok(Arc::new(ZeroOrOne::new(compiled)));
    }

    // No recognised path-predicate present: treat as a sequence (RDF list)
    // of sub-paths, matching the teacher's "falls through to the structural
    // default" dispatch style.
    let has_first = path_node
        .quads
        .iter()
        .any(|q| q.subject == path_node.id && q.predicate.as_named() == Some(rdf::FIRST));
    if has_first || path_node.id.as_named() == Some(rdf::NIL) {
        let members = decode_list(path_node)?;
        let compiled: Result<Vec<_>, _> = members.iter().map(compile_path).collect();
        return Ok(Arc::new(Sequence::new(compiled?)));
    }

    Err(LensError::new(ErrorKind::PathUncompilable, vec![]))
}

fn single_object(container: &Container<Term>, predicate: &str) -> Result<Option<Term>, LensError> {
    let mut matches = container
        .quads
        .iter()
        .filter(|q| q.subject == container.id && q.predicate.as_named() == Some(predicate))
        .map(|q| q.object.clone());
    match (matches.next(), matches.next()) {
        (None, _) => Ok(None),
        (Some(first), None) => Ok(Some(first)),
        (Some(_), Some(_)) => Err(LensError::new(
            ErrorKind::Message(format!("multiple values for path predicate {predicate}")),
            vec![],
        )),
    }
}

/// `sh:inversePath`: swaps subject/object for every matching quad. Built by
/// re-filtering the quad set rather than delegating to the compiled forward
/// lens, since predicate direction is not generally invertible through an
/// arbitrary sub-path (only through a bare predicate).
struct InversePath {
    inner: ArcMulti<Container<Term>, Container<Term>>,
}

impl InversePath {
    fn new(inner: ArcMulti<Container<Term>, Container<Term>>) -> Self {
        Self { inner }
    }
}

impl MultiLens<Container<Term>, Container<Term>> for InversePath {
    fn execute(&self, focus: &Container<Term>, ctx: &RunContext) -> Result<Vec<Container<Term>>, LensError> {
        // Run the forward sub-path from every candidate subject in the graph
        // and keep those whose result includes our focus.
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for q in focus.quads.iter() {
            let candidate = focus.with_id(q.subject.clone());
            if !seen.insert(candidate.id.clone()) {
                continue;
            }
            if let Ok(results) = self.inner.execute(&candidate, ctx) {
                if results.iter().any(|r| r.id == focus.id) {
                    out.push(candidate);
                }
            }
        }
        Ok(out)
    }
}

/// Sequence path: `p1/p2/.../pn`, threading each step's outputs as the next
/// step's inputs. Strict: an empty intermediate step yields no results for
/// the whole sequence rather than an error.
struct Sequence {
    steps: Vec<ArcMulti<Container<Term>, Container<Term>>>,
}

impl Sequence {
    fn new(steps: Vec<ArcMulti<Container<Term>, Container<Term>>>) -> Self {
        Self { steps }
    }
}

impl MultiLens<Container<Term>, Container<Term>> for Sequence {
    fn execute(&self, focus: &Container<Term>, ctx: &RunContext) -> Result<Vec<Container<Term>>, LensError> {
        let mut frontier = vec![focus.clone()];
        for step in &self.steps {
            let mut next = Vec::new();
            for item in &frontier {
                next.extend(step.execute(item, ctx)?);
            }
            frontier = next;
        }
        Ok(frontier)
    }
}

/// `sh:zeroOrMorePath`/`sh:oneOrMorePath`: repeated application of `inner`
/// until no new nodes are reached, deduplicated by [`Unique`] so cyclic
/// graphs terminate.
struct Closure {
    inner: ArcMulti<Container<Term>, Container<Term>>,
    include_zero: bool,
}

impl Closure {
    fn new(inner: ArcMulti<Container<Term>, Container<Term>>, include_zero: bool) -> Self {
        Self {
            inner,
            include_zero,
        }
    }
}

impl MultiLens<Container<Term>, Container<Term>> for Closure {
    fn execute(&self, focus: &Container<Term>, ctx: &RunContext) -> Result<Vec<Container<Term>>, LensError> {
        let mut visited = HashSet::new();
        let mut out = Vec::new();
        if self.include_zero {
            visited.insert(focus.id.clone());
            out.push(focus.clone());
        }

        let mut frontier = vec![focus.clone()];
        loop {
            let mut next = Vec::new();
            for item in &frontier {
                for reached in self.inner.execute(item, ctx)? {
                    if visited.insert(reached.id.clone()) {
                        out.push(reached.clone());
                        next.push(reached);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }
        Ok(out)
    }
}

/// `sh:zeroOrOnePath`: the focus itself, plus whatever `inner` reaches
/// directly (no further recursion).
struct ZeroOrOne {
    inner: ArcMulti<Container<Term>, Container<Term>>,
}

impl ZeroOrOne {
    fn new(inner: ArcMulti<Container<Term>, Container<Term>>) -> Self {
        Self { inner }
    }
}

impl MultiLens<Container<Term>, Container<Term>> for ZeroOrOne {
    fn execute(&self, focus: &Container<Term>, ctx: &RunContext) -> Result<Vec<Container<Term>>, LensError> {
        let mut out = vec![focus.clone()];
        out.extend(self.inner.execute(focus, ctx)?);
        Ok(out.unique_vec())
    }
}

trait DedupTerms {
    fn unique_vec(self) -> Self;
}

impl DedupTerms for Vec<Container<Term>> {
    fn unique_vec(self) -> Self {
        let mut seen = HashSet::new();
        self.into_iter().filter(|c| seen.insert(c.id.clone())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Quad;
    use std::collections::HashMap;

    #[test]
    fn bare_iri_compiles_to_predicate_path() {
        let quads = vec![Quad::new(Term::named("s"), Term::named("p"), Term::named("o"))];
        let path_node = Container::root(Term::named("p"), quads);
        let compiled = compile_path(&path_node).unwrap();
        let ctx = RunContext::new(HashMap::new());
        let focus = path_node.with_id(Term::named("s"));
        let results = compiled.execute(&focus, &ctx).unwrap();
        assert_eq!(results[0].id, Term::named("o"));
    }

    #[test]
    fn sequence_path_chains_steps() {
        let quads = vec![
            Quad::new(Term::named("a"), Term::named("p1"), Term::named("b")),
            Quad::new(Term::named("b"), Term::named("p2"), Term::named("c")),
            Quad::new(Term::blank("l0"), Term::named(rdf::FIRST), Term::named("p1")),
            Quad::new(Term::blank("l0"), Term::named(rdf::REST), Term::blank("l1")),
            Quad::new(Term::blank("l1"), Term::named(rdf::FIRST), Term::named("p2")),
            Quad::new(Term::blank("l1"), Term::named(rdf::REST), Term::named(rdf::NIL)),
        ];
        let path_node = Container::root(Term::blank("l0"), quads);
        let compiled = compile_path(&path_node).unwrap();
        let ctx = RunContext::new(HashMap::new());
        let focus = path_node.with_id(Term::named("a"));
        let results = compiled.execute(&focus, &ctx).unwrap();
        assert_eq!(results[0].id, Term::named("c"));
    }
}
