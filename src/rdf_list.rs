//! RDF collection (`rdf:first`/`rdf:rest`/`rdf:nil`) decoding (§4.D).
//!
//! SHACL path lists (`sh:alternativePath`, sequence paths given as a bare
//! list) are encoded as RDF collections. This walks one down to a `Vec` of
//! its element terms, failing on malformed input (a node with no `rdf:rest`,
//! more than one `rdf:first`/`rdf:rest`, or a cycle).

use std::collections::HashSet;

use crate::container::Container;
use crate::error::{ErrorKind, LensError};
use crate::term::Term;
use crate::vocab::rdf;

/// Decodes the RDF list rooted at `focus` into its element containers, in
/// list order. An empty list (`focus == rdf:nil`) decodes to `Vec::new()`.
pub fn decode_list(focus: &Container<Term>) -> Result<Vec<Container<Term>>, LensError> {
    let mut out = Vec::new();
    let mut current = focus.id.clone();
    let mut visited = HashSet::new();

    loop {
        if current.as_named() == Some(rdf::NIL) {
            return Ok(out);
        }
        if !visited.insert(current.clone()) {
            return Err(LensError::new(
                ErrorKind::ListMalformed(format!("cycle at {current}")),
                vec![],
            ));
        }

        let firsts: Vec<&Term> = focus
            .quads
            .iter()
            .filter(|q| q.subject == current && q.predicate.as_named() == Some(rdf::FIRST))
            .map(|q| &q.object)
            .collect();
        let rests: Vec<&Term> = focus
            .quads
            .iter()
            .filter(|q| q.subject == current && q.predicate.as_named() == Some(rdf::REST))
            .map(|q| &q.object)
            .collect();

        if firsts.len() != 1 {
            return Err(LensError::new(
                ErrorKind::ListMalformed(format!(
                    "expected exactly one rdf:first at {current}, found {}",
                    firsts.len()
                )),
                vec![],
            ));
        }
        if rests.len() != 1 {
            return Err(LensError::new(
                ErrorKind::ListMalformed(format!(
                    "expected exactly one rdf:rest at {current}, found {}",
                    rests.len()
                )),
                vec![],
            ));
        }

        out.push(focus.with_id(firsts[0].clone()));
        current = rests[0].clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Quad;

    fn list_quads(items: &[&str]) -> Vec<Quad> {
        let mut quads = Vec::new();
        let mut node = "head".to_string();
        for (i, item) in items.iter().enumerate() {
            let next = if i + 1 == items.len() {
                rdf::NIL.to_string()
            } else {
                format!("n{}", i + 1)
            };
            quads.push(Quad::new(
                Term::blank(node.clone()),
                Term::named(rdf::FIRST),
                Term::named(*item),
            ));
            let rest = if next == rdf::NIL {
                Term::named(rdf::NIL)
            } else {
                Term::blank(next.clone())
            };
            quads.push(Quad::new(Term::blank(node.clone()), Term::named(rdf::REST), rest));
            node = next;
        }
        quads
    }

    #[test]
    fn decodes_well_formed_list() {
        let quads = list_quads(&["a", "b", "c"]);
        let container = Container::root(Term::blank("head"), quads);
        let decoded = decode_list(&container).unwrap();
        let values: Vec<_> = decoded.iter().map(|c| c.id.value().to_string()).collect();
        assert_eq!(values, vec!["a", "b", "c"]);
    }

    #[test]
    fn nil_decodes_to_empty() {
        let container = Container::root(Term::named(rdf::NIL), vec![]);
        assert_eq!(decode_list(&container).unwrap().len(), 0);
    }

    #[test]
    fn missing_rest_is_malformed() {
        let quads = vec![Quad::new(
            Term::blank("head"),
            Term::named(rdf::FIRST),
            Term::named("a"),
        )];
        let container = Container::root(Term::blank("head"), quads);
        assert!(matches!(
            decode_list(&container).unwrap_err().kind,
            ErrorKind::ListMalformed(_)
        ));
    }
}
