//! The lens combinator algebra (§4.B) and its primitive leaves (§4.C).
//!
//! Two traits carry the algebra: [`SingleLens`] for focus-to-one-value steps
//! and [`MultiLens`] for focus-to-many-values steps, mirroring the way the
//! teacher keeps `Lens` a trait with concrete combinator structs (`Then`,
//! `Map`) rather than folding composition into closures.

mod cached;
mod multi;
mod primitives;
mod single;

pub use cached::{cached_record, CacheKey, Cached};
pub use multi::{
    ArcMulti, AsMulti, ExpectOne, Filter, MapAll, MultiLens, MultiLensExt, NamedMulti, One, OrAll,
    OrM, Reduce, ThenAll, ThenFlat, ThenSome,
};
pub use primitives::{
    Empty, InvPred, Match, ObjectOf, Pred, PredTriple, PredicateOf, Slot, SubjectOf, Subjects,
    Unique, UniqueExt,
};
pub use single::{
    AndRecords, ArcSingle, Identity, MapSingle, NamedSingle, Or, SingleLens, SingleLensExt,
    ThenSingle,
};
