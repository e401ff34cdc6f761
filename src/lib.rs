// Copyright 2018 The Druid Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A declarative data-extraction engine for RDF graphs.
//!
//! Shapes written in a SHACL dialect ([`shape::extract_shapes`]) compile down
//! to a tree of composable lenses (the [`lens`] module) over a quad set (the
//! [`container`] module). Running a compiled shape against a focus node
//! ([`typed_extract::extract`]) produces a dynamically-typed [`record::Value`]
//! — typically a [`record::Value::Record`] whose fields are named by
//! `sh:name` and typed by `sh:datatype`/`sh:class`.
//!
//! A typical caller:
//!
//! 1. Parses their shapes graph and their data graph into [`term::Quad`]s.
//! 2. Runs [`env_replace::resolve_env_vars`] over the shapes graph, then
//!    [`shape::extract_shapes`] to compile it into a [`shape::ShapeSet`].
//! 3. Builds a [`container::Container`] rooted at the subject they want to
//!    extract, and a [`context::RunContext`] carrying the environment and a
//!    fresh memo table.
//! 4. Calls [`typed_extract::extract`] with the expected `rdf:type`.
//!
//! Failures carry a lineage breadcrumb trail (`named()` frames entered along
//! the way) rather than just a bare message — see [`error::LensError`].

pub mod container;
pub mod context;
pub mod datatype;
pub mod env_replace;
pub mod error;
pub mod lens;
pub mod path;
pub mod rdf_list;
pub mod record;
pub mod shape;
pub mod term;
pub mod typed_extract;
pub mod vocab;

pub use container::Container;
pub use context::RunContext;
pub use error::{ErrorKind, LensError, LineageFrame};
pub use lens::{
    ArcMulti, ArcSingle, Empty, Identity, InvPred, Match, MultiLens, MultiLensExt, Pred,
    PredTriple, Slot, SingleLens, SingleLensExt, Subjects, UniqueExt,
};
pub use record::{Record, SharedRecord, Value};
pub use shape::{extract_shapes, Shape, ShapeSet};
pub use term::{Literal, Quad, Term};
pub use typed_extract::extract as typed_extract;

/// Initializes a process-wide `tracing` subscriber reading `RUST_LOG`,
/// mirroring the teacher's `default-logger` feature. Call at most once, at
/// the start of `main`; a no-op if a subscriber is already installed.
#[cfg(feature = "default-logger")]
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let _ = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .try_init();
}
