//! Typed errors and lineage reporting (§4.K, §7).
//!
//! Every [`LensError`] carries a snapshot of the lineage stack at the point
//! of failure: the chain of `named()` steps the evaluator had entered when
//! the failure was raised. Combinators decide whether an error propagates
//! (strict) or is absorbed (tolerant); see `crate::lens`.

use std::fmt;

/// One frame of lineage: the name a lens was `named()` with, and an
/// optional free-form description of the arguments it was invoked with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineageFrame {
    pub name: String,
    pub opts: Option<String>,
}

impl LineageFrame {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            opts: None,
        }
    }

    pub fn with_opts(name: impl Into<String>, opts: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            opts: Some(opts.into()),
        }
    }
}

impl fmt::Display for LineageFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.opts {
            Some(opts) => write!(f, "{}({})", self.name, opts),
            None => write!(f, "{}", self.name),
        }
    }
}

/// The kind of failure, one variant per §7 error kind.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ErrorKind {
    #[error("expected between {min} and {max} matches, found {found}")]
    Cardinality {
        min: u32,
        max: DisplayMax,
        found: usize,
    },

    #[error("missing required field `{field}`")]
    MissingRequired { field: String },

    #[error("expected {expected}, found {found}")]
    WrongType { expected: String, found: String },

    #[error("sh:class `{0}` has no registered lens")]
    UnknownClass(String),

    #[error("expected a type, found none")]
    NoType,

    #[error("malformed rdf list: {0}")]
    ListMalformed(String),

    #[error("path node did not match any known path shape")]
    PathUncompilable,

    #[error("ENV and default are not set")]
    EnvUnresolved,

    #[error("{0}")]
    Message(String),
}

/// Cosmetic wrapper so `Cardinality`'s unbounded `max` prints as `unbounded`
/// instead of leaking an `Option<u32>` `Debug` rendering into the message.
#[derive(Debug, Clone, Copy)]
pub struct DisplayMax(pub Option<u32>);

impl fmt::Display for DisplayMax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(n) => write!(f, "{n}"),
            None => write!(f, "unbounded"),
        }
    }
}

/// A lens evaluation failure, carrying the lineage stack at the point it
/// was raised.
#[derive(Debug, Clone)]
pub struct LensError {
    pub kind: ErrorKind,
    pub lineage: Vec<LineageFrame>,
}

impl LensError {
    pub fn new(kind: ErrorKind, lineage: Vec<LineageFrame>) -> Self {
        tracing::debug!(
            kind = %kind,
            lineage = %render_lineage(&lineage),
            "lens evaluation failed"
        );
        Self { kind, lineage }
    }

    pub fn cardinality(min: u32, max: Option<u32>, found: usize, lineage: Vec<LineageFrame>) -> Self {
        Self::new(
            ErrorKind::Cardinality {
                min,
                max: DisplayMax(max),
                found,
            },
            lineage,
        )
    }

    pub fn missing_required(field: impl Into<String>, lineage: Vec<LineageFrame>) -> Self {
        Self::new(ErrorKind::MissingRequired { field: field.into() }, lineage)
    }
}

fn render_lineage(lineage: &[LineageFrame]) -> String {
    lineage
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" > ")
}

impl fmt::Display for LensError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lineage.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} (at {})", self.kind, render_lineage(&self.lineage))
        }
    }
}

impl std::error::Error for LensError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}
