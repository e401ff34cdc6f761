//! The quad store view threaded through every lens (§4.A).

use std::sync::Arc;

use crate::term::{Quad, Term};

/// The focus a lens is invoked against: an `id` (usually a [`Term`], but a
/// [`Quad`] when pivoting between a triple and its subject/predicate/object)
/// plus the surrounding quad set, held by reference so composing lenses
/// never copies the graph.
#[derive(Clone)]
pub struct Container<Q = Term> {
    pub id: Q,
    pub quads: Arc<[Quad]>,
}

impl<Q> Container<Q> {
    pub fn new(id: Q, quads: Arc<[Quad]>) -> Self {
        Self { id, quads }
    }

    /// Pivots to a new focus over the same quad set.
    pub fn with_id<Q2>(&self, id: Q2) -> Container<Q2> {
        Container {
            id,
            quads: self.quads.clone(),
        }
    }
}

impl Container<Term> {
    pub fn root(id: Term, quads: impl Into<Arc<[Quad]>>) -> Self {
        Self {
            id,
            quads: quads.into(),
        }
    }
}
