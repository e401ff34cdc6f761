//! RDF terms and quads.
//!
//! Modeled after the generalized-RDF term representations used across the
//! Rust RDF ecosystem (`rdf-types`, `oxrdf`): terms are value-typed and
//! structurally comparable, and a quoted triple is just another term
//! (`Term::Quad`) so `(s, p, o, g)` positions can themselves be quads.

use std::fmt;
use std::sync::Arc;

/// The IRI used for the (implicit) default graph of a [`Quad`].
pub const DEFAULT_GRAPH: &str = "urn:x-rdf-lens:default-graph";

/// An RDF literal: a lexical form, a datatype IRI, and an optional language tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    pub lexical: Arc<str>,
    pub datatype: Arc<str>,
    pub language: Option<Arc<str>>,
}

impl Literal {
    pub fn new(lexical: impl Into<Arc<str>>, datatype: impl Into<Arc<str>>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: datatype.into(),
            language: None,
        }
    }

    pub fn with_language(lexical: impl Into<Arc<str>>, language: impl Into<Arc<str>>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: Arc::from(crate::vocab::rdf::LANG_STRING),
            language: Some(language.into()),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.lexical)?;
        if let Some(lang) = &self.language {
            write!(f, "@{lang}")
        } else {
            write!(f, "^^<{}>", self.datatype)
        }
    }
}

/// An RDF term: a named node, a blank node, a literal, or (for RDF-star-like
/// quoted triples) a nested quad.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    NamedNode(Arc<str>),
    BlankNode(Arc<str>),
    Literal(Literal),
    Quad(Box<Quad>),
}

/// The relative emission rank used by `unique()`: Literals, then NamedNodes,
/// then BlankNodes, with quoted quads last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum TermRank {
    Literal = 0,
    NamedNode = 1,
    BlankNode = 2,
    Quad = 3,
}

impl Term {
    pub fn named(iri: impl Into<Arc<str>>) -> Self {
        Term::NamedNode(iri.into())
    }

    pub fn blank(label: impl Into<Arc<str>>) -> Self {
        Term::BlankNode(label.into())
    }

    pub fn literal(lexical: impl Into<Arc<str>>, datatype: impl Into<Arc<str>>) -> Self {
        Term::Literal(Literal::new(lexical, datatype))
    }

    pub fn string(value: impl Into<Arc<str>>) -> Self {
        Term::Literal(Literal::new(value, crate::vocab::xsd::STRING))
    }

    pub fn default_graph() -> Self {
        Term::NamedNode(Arc::from(DEFAULT_GRAPH))
    }

    pub fn is_default_graph(&self) -> bool {
        matches!(self, Term::NamedNode(iri) if &**iri == DEFAULT_GRAPH)
    }

    pub fn as_named(&self) -> Option<&str> {
        match self {
            Term::NamedNode(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// The term's lexical value, mirroring `t.value` in the source vocabulary:
    /// the IRI for named nodes, the label for blank nodes, the lexical form
    /// for literals.
    pub fn value(&self) -> &str {
        match self {
            Term::NamedNode(iri) => iri,
            Term::BlankNode(label) => label,
            Term::Literal(lit) => &lit.lexical,
            Term::Quad(_) => "",
        }
    }

    pub(crate) fn rank(&self) -> TermRank {
        match self {
            Term::Literal(_) => TermRank::Literal,
            Term::NamedNode(_) => TermRank::NamedNode,
            Term::BlankNode(_) => TermRank::BlankNode,
            Term::Quad(_) => TermRank::Quad,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::NamedNode(iri) => write!(f, "<{iri}>"),
            Term::BlankNode(label) => write!(f, "_:{label}"),
            Term::Literal(lit) => write!(f, "{lit}"),
            Term::Quad(q) => write!(f, "<<{} {} {}>>", q.subject, q.predicate, q.object),
        }
    }
}

/// A value-typed, immutable RDF quad: `(subject, predicate, object, graph)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quad {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
    pub graph: Term,
}

impl Quad {
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
            graph: Term::default_graph(),
        }
    }

    pub fn in_graph(subject: Term, predicate: Term, object: Term, graph: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
            graph,
        }
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_roundtrips_kind() {
        let t = Term::named("http://example.org/a");
        assert_eq!(t.to_string(), "<http://example.org/a>");
        assert_eq!(Term::blank("b1").to_string(), "_:b1");
    }

    #[test]
    fn rank_orders_literal_named_blank() {
        assert!(Term::string("x").rank() < Term::named("x").rank());
        assert!(Term::named("x").rank() < Term::blank("x").rank());
    }
}
