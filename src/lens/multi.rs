//! Multi-valued lenses: `M<C,T>` produces a finite ordered sequence of `T`.
//!
//! Conceptually `MultiLens<C,T> ≡ SingleLens<C, Vec<T>>`, but with a richer
//! combinator surface and its own failure-tolerance rules (§4.B).

use std::sync::Arc;

use crate::context::RunContext;
use crate::error::{ErrorKind, LensError, LineageFrame};
use crate::lens::single::{ArcSingle, SingleLens};

pub trait MultiLens<C, T>: Send + Sync {
    fn execute(&self, focus: &C, ctx: &RunContext) -> Result<Vec<T>, LensError>;
}

pub type ArcMulti<C, T> = Arc<dyn MultiLens<C, T>>;

impl<C, T> MultiLens<C, T> for ArcMulti<C, T> {
    fn execute(&self, focus: &C, ctx: &RunContext) -> Result<Vec<T>, LensError> {
        (**self).execute(focus, ctx)
    }
}

pub trait MultiLensExt<C, T>: MultiLens<C, T> + Sized + 'static {
    fn map_all<U, F>(self, f: F) -> MapAll<Self, F>
    where
        F: Fn(T) -> U + Send + Sync,
    {
        MapAll { inner: self, f }
    }

    /// `thenAll(n)`: apply `n` to every element; strict — any per-element
    /// failure propagates.
    fn then_all<U, N>(self, next: N) -> ThenAll<Self, N>
    where
        N: SingleLens<T, U>,
    {
        ThenAll {
            inner: self,
            next,
        }
    }

    /// `thenSome(n)`: like `thenAll` but tolerant — per-element failures are
    /// dropped rather than propagated.
    fn then_some<U, N>(self, next: N) -> ThenSome<Self, N>
    where
        N: SingleLens<T, U>,
    {
        ThenSome {
            inner: self,
            next,
        }
    }

    /// `thenFlat(n)`: flatMap over a following multi-lens. Tolerant — an
    /// inner lens that errors for a given element contributes no results
    /// for that element rather than failing the whole composition.
    fn then_flat<U, N>(self, next: N) -> ThenFlat<Self, N>
    where
        N: MultiLens<T, U>,
    {
        ThenFlat {
            inner: self,
            next,
        }
    }

    fn filter<P>(self, predicate: P) -> Filter<Self, P>
    where
        P: Fn(&T) -> bool + Send + Sync,
    {
        Filter {
            inner: self,
            predicate,
        }
    }

    /// `one(default?)`: first element, or `default` (or fail if no default
    /// and `T` has none — modelled here as `Option<T>` at the call site).
    fn one(self, default: Option<T>) -> One<Self, T>
    where
        T: Clone,
    {
        One {
            inner: self,
            default,
        }
    }

    /// `expectOne`: first element, or a `MissingRequired`-flavoured error.
    fn expect_one(self, field_name: impl Into<String>) -> ExpectOne<Self> {
        ExpectOne {
            inner: self,
            field_name: field_name.into(),
        }
    }

    /// `reduce(step, init)`: left-fold over the sequence.
    fn reduce<A, Step, Init>(self, step: Step, init: Init) -> Reduce<Self, Step, Init>
    where
        Step: SingleLens<(T, A), A>,
        Init: SingleLens<C, A>,
    {
        Reduce {
            inner: self,
            step,
            init,
        }
    }

    fn named(self, name: impl Into<String>) -> NamedMulti<Self> {
        NamedMulti {
            inner: self,
            name: name.into(),
            opts: None,
        }
    }

    fn named_with(self, name: impl Into<String>, opts: impl Into<String>) -> NamedMulti<Self> {
        NamedMulti {
            inner: self,
            name: name.into(),
            opts: Some(opts.into()),
        }
    }

    fn boxed(self) -> ArcMulti<C, T>
    where
        C: 'static,
        T: 'static,
    {
        Arc::new(self)
    }
}

impl<C, T, L: MultiLens<C, T> + 'static> MultiLensExt<C, T> for L {}

/// `asMulti`: view a single-valued vec-lens as multi.
pub struct AsMulti<L> {
    inner: L,
}

impl<L> AsMulti<L> {
    pub fn new(inner: L) -> Self {
        Self { inner }
    }
}

impl<C, T, L: SingleLens<C, Vec<T>>> MultiLens<C, T> for AsMulti<L> {
    fn execute(&self, focus: &C, ctx: &RunContext) -> Result<Vec<T>, LensError> {
        self.inner.execute(focus, ctx)
    }
}

pub struct MapAll<L, F> {
    inner: L,
    f: F,
}

impl<C, T, U, L, F> MultiLens<C, U> for MapAll<L, F>
where
    L: MultiLens<C, T>,
    F: Fn(T) -> U + Send + Sync,
{
    fn execute(&self, focus: &C, ctx: &RunContext) -> Result<Vec<U>, LensError> {
        Ok(self
            .inner
            .execute(focus, ctx)?
            .into_iter()
            .map(&self.f)
            .collect())
    }
}

pub struct ThenAll<L, N> {
    inner: L,
    next: N,
}

impl<C, T, U, L, N> MultiLens<C, U> for ThenAll<L, N>
where
    L: MultiLens<C, T>,
    N: SingleLens<T, U>,
{
    fn execute(&self, focus: &C, ctx: &RunContext) -> Result<Vec<U>, LensError> {
        self.inner
            .execute(focus, ctx)?
            .iter()
            .map(|item| self.next.execute(item, ctx))
            .collect()
    }
}

pub struct ThenSome<L, N> {
    inner: L,
    next: N,
}

impl<C, T, U, L, N> MultiLens<C, U> for ThenSome<L, N>
where
    L: MultiLens<C, T>,
    N: SingleLens<T, U>,
{
    fn execute(&self, focus: &C, ctx: &RunContext) -> Result<Vec<U>, LensError> {
        let items = self.inner.execute(focus, ctx)?;
        Ok(items
            .iter()
            .filter_map(|item| self.next.execute(item, ctx).ok())
            .collect())
    }
}

pub struct ThenFlat<L, N> {
    inner: L,
    next: N,
}

impl<C, T, U, L, N> MultiLens<C, U> for ThenFlat<L, N>
where
    L: MultiLens<C, T>,
    N: MultiLens<T, U>,
{
    fn execute(&self, focus: &C, ctx: &RunContext) -> Result<Vec<U>, LensError> {
        let items = self.inner.execute(focus, ctx)?;
        let mut out = Vec::new();
        for item in &items {
            if let Ok(mut more) = self.next.execute(item, ctx) {
                out.append(&mut more);
            }
        }
        Ok(out)
    }
}

/// `orAll(l1..ln)`: concatenate successes, drop failures.
pub struct OrAll<C, T> {
    alts: Vec<ArcMulti<C, T>>,
}

impl<C, T> OrAll<C, T> {
    pub fn new(alts: Vec<ArcMulti<C, T>>) -> Self {
        Self { alts }
    }
}

impl<C, T> MultiLens<C, T> for OrAll<C, T> {
    fn execute(&self, focus: &C, ctx: &RunContext) -> Result<Vec<T>, LensError> {
        let mut out = Vec::new();
        for alt in &self.alts {
            let branch_ctx = ctx.clone();
            if let Ok(mut items) = alt.execute(focus, &branch_ctx) {
                out.append(&mut items);
            }
        }
        Ok(out)
    }
}

/// `orM(l1..ln)`: run several single lenses, collect successes.
pub struct OrM<C, T> {
    alts: Vec<ArcSingle<C, T>>,
}

impl<C, T> OrM<C, T> {
    pub fn new(alts: Vec<ArcSingle<C, T>>) -> Self {
        Self { alts }
    }
}

impl<C, T> MultiLens<C, T> for OrM<C, T> {
    fn execute(&self, focus: &C, ctx: &RunContext) -> Result<Vec<T>, LensError> {
        Ok(self
            .alts
            .iter()
            .filter_map(|alt| {
                let branch_ctx = ctx.clone();
                alt.execute(focus, &branch_ctx).ok()
            })
            .collect())
    }
}

pub struct Filter<L, P> {
    inner: L,
    predicate: P,
}

impl<C, T, L, P> MultiLens<C, T> for Filter<L, P>
where
    L: MultiLens<C, T>,
    P: Fn(&T) -> bool + Send + Sync,
{
    fn execute(&self, focus: &C, ctx: &RunContext) -> Result<Vec<T>, LensError> {
        Ok(self
            .inner
            .execute(focus, ctx)?
            .into_iter()
            .filter(|item| (self.predicate)(item))
            .collect())
    }
}

pub struct One<L, T> {
    inner: L,
    default: Option<T>,
}

impl<C, T, L> SingleLens<C, T> for One<L, T>
where
    L: MultiLens<C, T>,
    T: Clone + Send + Sync,
{
    fn execute(&self, focus: &C, ctx: &RunContext) -> Result<T, LensError> {
        let mut items = self.inner.execute(focus, ctx)?;
        if items.is_empty() {
            match &self.default {
                Some(default) => Ok(default.clone()),
                None => Err(LensError::new(
                    ErrorKind::Message("one(): no value and no default".into()),
                    ctx.lineage_snapshot(),
                )),
            }
        } else {
            Ok(items.swap_remove(0))
        }
    }
}

pub struct ExpectOne<L> {
    inner: L,
    field_name: String,
}

impl<C, T, L> SingleLens<C, T> for ExpectOne<L>
where
    L: MultiLens<C, T>,
{
    fn execute(&self, focus: &C, ctx: &RunContext) -> Result<T, LensError> {
        let mut items = self.inner.execute(focus, ctx)?;
        if items.is_empty() {
            Err(LensError::missing_required(
                self.field_name.clone(),
                ctx.lineage_snapshot(),
            ))
        } else {
            Ok(items.remove(0))
        }
    }
}

pub struct Reduce<L, Step, Init> {
    inner: L,
    step: Step,
    init: Init,
}

impl<C, T, A, L, Step, Init> SingleLens<C, A> for Reduce<L, Step, Init>
where
    L: MultiLens<C, T>,
    Step: SingleLens<(T, A), A>,
    Init: SingleLens<C, A>,
{
    fn execute(&self, focus: &C, ctx: &RunContext) -> Result<A, LensError> {
        let items = self.inner.execute(focus, ctx)?;
        let mut acc = self.init.execute(focus, ctx)?;
        for item in items {
            acc = self.step.execute(&(item, acc), ctx)?;
        }
        Ok(acc)
    }
}

pub struct NamedMulti<L> {
    inner: L,
    name: String,
    opts: Option<String>,
}

impl<C, T, L: MultiLens<C, T>> MultiLens<C, T> for NamedMulti<L> {
    fn execute(&self, focus: &C, ctx: &RunContext) -> Result<Vec<T>, LensError> {
        let frame = match &self.opts {
            Some(opts) => LineageFrame::with_opts(self.name.clone(), opts.clone()),
            None => LineageFrame::new(self.name.clone()),
        };
        let child = ctx.with_frame(frame);
        self.inner.execute(focus, &child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Const(Vec<i64>);
    impl MultiLens<(), i64> for Const {
        fn execute(&self, _: &(), _ctx: &RunContext) -> Result<Vec<i64>, LensError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn expect_one_fails_on_empty() {
        let lens = ExpectOne {
            inner: Const(vec![]),
            field_name: "y".into(),
        };
        let ctx = RunContext::new(HashMap::new());
        let err = lens.execute(&(), &ctx).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MissingRequired { .. }));
    }

    #[test]
    fn one_uses_default_when_empty() {
        let lens = One {
            inner: Const(vec![]),
            default: Some(42i64),
        };
        let ctx = RunContext::new(HashMap::new());
        assert_eq!(lens.execute(&(), &ctx).unwrap(), 42);
    }

    #[test]
    fn or_all_concatenates_and_drops_failures() {
        struct Bad;
        impl MultiLens<(), i64> for Bad {
            fn execute(&self, _: &(), ctx: &RunContext) -> Result<Vec<i64>, LensError> {
                Err(LensError::new(ErrorKind::Message("x".into()), ctx.lineage_snapshot()))
            }
        }
        let lens = OrAll::new(vec![Arc::new(Const(vec![1, 2])), Arc::new(Bad), Arc::new(Const(vec![3]))]);
        let ctx = RunContext::new(HashMap::new());
        assert_eq!(lens.execute(&(), &ctx).unwrap(), vec![1, 2, 3]);
    }
}
