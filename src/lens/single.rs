//! Single-valued lenses: `L<C,T>` produces exactly one `T`, or fails.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::context::RunContext;
use crate::error::{ErrorKind, LensError, LineageFrame};

/// A lens that produces exactly one `T` from a focus `C`, or fails.
///
/// See also [`MultiLens`](crate::lens::MultiLens) for the multi-valued
/// counterpart; the two share a combinator vocabulary (`map`, `then`,
/// `named`) but are kept as separate traits rather than unified under one
/// `Vec`-returning trait, the same way the teacher keeps `Lens` a distinct
/// trait from its `Then`/`Map` combinator structs rather than collapsing
/// composition into a single generic function.
pub trait SingleLens<C, T>: Send + Sync {
    fn execute(&self, focus: &C, ctx: &RunContext) -> Result<T, LensError>;
}

pub type ArcSingle<C, T> = Arc<dyn SingleLens<C, T>>;

impl<C, T> SingleLens<C, T> for ArcSingle<C, T> {
    fn execute(&self, focus: &C, ctx: &RunContext) -> Result<T, LensError> {
        (**self).execute(focus, ctx)
    }
}

/// Helpers for composing `SingleLens`es, mirroring `LensExt` in spirit:
/// methods take `self` by value and return a new concrete combinator type.
pub trait SingleLensExt<C, T>: SingleLens<C, T> + Sized + 'static {
    fn map<U, F>(self, f: F) -> MapSingle<Self, F>
    where
        F: Fn(T) -> U + Send + Sync,
    {
        MapSingle { inner: self, f }
    }

    fn then<U, N>(self, next: N) -> ThenSingle<Self, N>
    where
        N: SingleLens<T, U>,
    {
        ThenSingle {
            left: self,
            right: next,
        }
    }

    fn named(self, name: impl Into<String>) -> NamedSingle<Self> {
        NamedSingle {
            inner: self,
            name: name.into(),
            opts: None,
        }
    }

    fn named_with(self, name: impl Into<String>, opts: impl Into<String>) -> NamedSingle<Self> {
        NamedSingle {
            inner: self,
            name: name.into(),
            opts: Some(opts.into()),
        }
    }

    fn boxed(self) -> ArcSingle<C, T>
    where
        C: 'static,
        T: 'static,
    {
        Arc::new(self)
    }
}

impl<C, T, L: SingleLens<C, T> + 'static> SingleLensExt<C, T> for L {}

/// Identity lens: returns the focus unchanged. Backs the `empty()` primitive.
///
/// `PhantomData<fn() -> C>` rather than `PhantomData<C>` so `Identity<C>` is
/// `Send + Sync` regardless of whether `C` is — it never actually stores a
/// `C`.
pub struct Identity<C>(PhantomData<fn() -> C>);

impl<C> Identity<C> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<C> Default for Identity<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clone + Send + Sync> SingleLens<C, C> for Identity<C> {
    fn execute(&self, focus: &C, _ctx: &RunContext) -> Result<C, LensError> {
        Ok(focus.clone())
    }
}

/// `map(f)`: apply `f` to the wrapped lens's result. Pure, strict.
pub struct MapSingle<L, F> {
    inner: L,
    f: F,
}

impl<C, T, U, L, F> SingleLens<C, U> for MapSingle<L, F>
where
    L: SingleLens<C, T>,
    F: Fn(T) -> U + Send + Sync,
{
    fn execute(&self, focus: &C, ctx: &RunContext) -> Result<U, LensError> {
        self.inner.execute(focus, ctx).map(&self.f)
    }
}

/// `then(n)`: sequential composition, `L<C,T> ∘ L<T,U> → L<C,U>`. Strict.
pub struct ThenSingle<L, N> {
    left: L,
    right: N,
}

impl<C, T, U, L, N> SingleLens<C, U> for ThenSingle<L, N>
where
    L: SingleLens<C, T>,
    N: SingleLens<T, U>,
{
    fn execute(&self, focus: &C, ctx: &RunContext) -> Result<U, LensError> {
        let mid = self.left.execute(focus, ctx)?;
        self.right.execute(&mid, ctx)
    }
}

/// `named(name, opts?)`: pushes a lineage frame for the duration of `inner`.
pub struct NamedSingle<L> {
    inner: L,
    name: String,
    opts: Option<String>,
}

impl<C, T, L: SingleLens<C, T>> SingleLens<C, T> for NamedSingle<L> {
    fn execute(&self, focus: &C, ctx: &RunContext) -> Result<T, LensError> {
        let frame = match &self.opts {
            Some(opts) => LineageFrame::with_opts(self.name.clone(), opts.clone()),
            None => LineageFrame::new(self.name.clone()),
        };
        let child = ctx.with_frame(frame);
        self.inner.execute(focus, &child)
    }
}

/// `or(l1..ln)`: try each alternative in order; the run context is cloned
/// per branch so lineage pushed by a failed branch never leaks into the
/// next one, while the (shared, reference-counted) memo table is unaffected
/// by the clone.
pub struct Or<C, T> {
    alts: Vec<ArcSingle<C, T>>,
}

impl<C, T> Or<C, T> {
    pub fn new(alts: Vec<ArcSingle<C, T>>) -> Self {
        Self { alts }
    }
}

impl<C, T> SingleLens<C, T> for Or<C, T> {
    fn execute(&self, focus: &C, ctx: &RunContext) -> Result<T, LensError> {
        let mut last_err = None;
        for alt in &self.alts {
            let branch_ctx = ctx.clone();
            match alt.execute(focus, &branch_ctx) {
                Ok(value) => return Ok(value),
                Err(err) => last_err = Some(err),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            LensError::new(
                ErrorKind::Message("or: no alternatives given".into()),
                ctx.lineage_snapshot(),
            )
        }))
    }
}

/// `and(l1..ln)` specialised to record-producing field lenses: run every
/// field lens against the same focus and union the resulting records.
/// Strict — any field failure fails the whole shape.
pub struct AndRecords<C> {
    fields: Vec<ArcSingle<C, crate::record::Record>>,
}

impl<C> AndRecords<C> {
    pub fn new(fields: Vec<ArcSingle<C, crate::record::Record>>) -> Self {
        Self { fields }
    }
}

impl<C> SingleLens<C, crate::record::Record> for AndRecords<C> {
    fn execute(&self, focus: &C, ctx: &RunContext) -> Result<crate::record::Record, LensError> {
        let mut merged = crate::record::Record::new();
        for field in &self.fields {
            let part = field.execute(focus, ctx)?;
            for (key, value) in part {
                merged.insert(key, value);
            }
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Fail;
    impl SingleLens<(), i64> for Fail {
        fn execute(&self, _: &(), ctx: &RunContext) -> Result<i64, LensError> {
            Err(LensError::new(
                ErrorKind::Message("nope".into()),
                ctx.lineage_snapshot(),
            ))
        }
    }
    struct Const(i64);
    impl SingleLens<(), i64> for Const {
        fn execute(&self, _: &(), _ctx: &RunContext) -> Result<i64, LensError> {
            Ok(self.0)
        }
    }

    #[test]
    fn or_falls_through_to_next_alternative() {
        let lens = Or::new(vec![Arc::new(Fail), Arc::new(Const(7))]);
        let ctx = RunContext::new(HashMap::new());
        assert_eq!(lens.execute(&(), &ctx).unwrap(), 7);
    }

    #[test]
    fn or_branch_lineage_does_not_leak() {
        struct Bomb;
        impl SingleLens<(), i64> for Bomb {
            fn execute(&self, _: &(), ctx: &RunContext) -> Result<i64, LensError> {
                let child = ctx.with_frame(LineageFrame::new("doomed-branch"));
                Err(LensError::new(ErrorKind::Message("x".into()), child.lineage_snapshot()))
            }
        }
        struct Echo;
        impl SingleLens<(), i64> for Echo {
            fn execute(&self, _: &(), ctx: &RunContext) -> Result<i64, LensError> {
                assert!(ctx.lineage_snapshot().is_empty());
                Ok(1)
            }
        }
        let lens = Or::new(vec![Arc::new(Bomb), Arc::new(Echo)]);
        let ctx = RunContext::new(HashMap::new());
        assert_eq!(lens.execute(&(), &ctx).unwrap(), 1);
    }
}
