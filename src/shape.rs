//! SHACL shape compilation (§4.G): turns a shapes graph into callable
//! [`Shape`]s, one per `sh:NodeShape`, each owning a compiled lens per
//! `sh:property`.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::container::Container;
use crate::context::RunContext;
use crate::datatype::Coerce;
use crate::error::{ErrorKind, LensError};
use crate::lens::{ArcMulti, MultiLens, SingleLens};
use crate::path::compile_path;
use crate::record::{Record, Value};
use crate::term::{Quad, Term};
use crate::vocab::{rdf, rdfl, rdfs, sh};

/// What a field's values are turned into once the path lens has located
/// them.
pub enum FieldKind {
    /// `sh:class <C>`: recurse through [`crate::typed_extract`] using `C` as
    /// the expected (but overridable, see Open Question #2) type.
    Class(Term),
    /// `sh:datatype <D>`: coerce the literal focus via [`Coerce`].
    Datatype(Term),
    /// `sh:datatype rdfl:CBD`: the concise bounded description of the focus
    /// — every quad reachable from it — as a raw [`Value::Quads`].
    ConciseBoundedDescription,
    /// `sh:datatype rdfl:Context`: the whole graph the focus quad belongs
    /// to, as a raw [`Value::Quads`].
    Context,
    /// `sh:datatype rdfl:PathLens`: the compiled path itself, as a
    /// first-class [`Value::Lens`].
    PathLens,
}

pub struct ShapeField {
    pub name: String,
    path_node: Container<Term>,
    pub kind: FieldKind,
    pub min_count: u32,
    pub max_count: Option<u32>,
}

impl ShapeField {
    fn compiled_path(&self) -> Result<ArcMulti<Container<Term>, Container<Term>>, LensError> {
        compile_path(&self.path_node)
    }
}

pub struct Shape {
    pub target_class: Option<Term>,
    pub fields: Vec<ShapeField>,
}

/// The result of compiling a shapes graph: every declared shape, plus the
/// `rdfs:subClassOf` edges needed to walk from an instance's concrete type
/// up to whichever ancestor a shape actually targets.
pub struct ShapeSet {
    pub shapes_by_class: IndexMap<Term, Shape>,
    pub subclass_of: HashMap<Term, Term>,
}

impl ShapeSet {
    pub fn shape_for(&self, class: &Term) -> Option<&Shape> {
        self.shapes_by_class.get(class)
    }

    /// Walks `class`, then its `rdfs:subClassOf` parent, then its
    /// grandparent, etc., returning the first shape found. Guards against a
    /// cyclic subclass graph with a visited set.
    pub fn shape_for_chain(&self, class: &Term) -> Vec<&Shape> {
        let mut chain = Vec::new();
        let mut current = Some(class.clone());
        let mut visited = std::collections::HashSet::new();
        while let Some(class) = current {
            if !visited.insert(class.clone()) {
                break;
            }
            if let Some(shape) = self.shapes_by_class.get(&class) {
                chain.push(shape);
            }
            current = self.subclass_of.get(&class).cloned();
        }
        chain
    }
}

/// Compiles every `sh:NodeShape` in `quads` into a [`ShapeSet`].
pub fn extract_shapes(quads: &[Quad]) -> Result<ShapeSet, LensError> {
    let mut shapes_by_class = IndexMap::new();

    let shape_nodes: Vec<Term> = quads
        .iter()
        .filter(|q| q.predicate.as_named() == Some(rdf::TYPE) && q.object.as_named() == Some(sh::NODE_SHAPE))
        .map(|q| q.subject.clone())
        .collect();

    for shape_node in shape_nodes {
        let target_class = single_object(quads, &shape_node, sh::TARGET_CLASS);
        let property_nodes: Vec<Term> = quads
            .iter()
            .filter(|q| q.subject == shape_node && q.predicate.as_named() == Some(sh::PROPERTY))
            .map(|q| q.object.clone())
            .collect();

        let mut fields = Vec::with_capacity(property_nodes.len());
        for property_node in property_nodes {
            fields.push(compile_field(quads, &property_node)?);
        }

        // A shape with no explicit `sh:targetClass` implicitly targets
        // itself (SPEC_FULL.md Open Question #3): useful for shapes that
        // only ever appear nested inside another shape's `sh:class`.
        let class_key = target_class.clone().unwrap_or_else(|| shape_node.clone());
        shapes_by_class.insert(class_key, Shape { target_class, fields });
    }

    let subclass_of = quads
        .iter()
        .filter(|q| q.predicate.as_named() == Some(rdfs::SUB_CLASS_OF))
        .map(|q| (q.subject.clone(), q.object.clone()))
        .collect();

    Ok(ShapeSet {
        shapes_by_class,
        subclass_of,
    })
}

fn compile_field(quads: &[Quad], property_node: &Term) -> Result<ShapeField, LensError> {
    let name = single_object(quads, property_node, sh::NAME)
        .map(|t| t.value().to_string())
        .ok_or_else(|| {
            LensError::new(
                ErrorKind::Message(format!("{property_node} has no sh:name")),
                vec![],
            )
        })?;

    let path_root = single_object(quads, property_node, sh::PATH).ok_or_else(|| {
        LensError::new(
            ErrorKind::Message(format!("{property_node} has no sh:path")),
            vec![],
        )
    })?;
    let path_node = Container::root(path_root, quads.to_vec());

    let min_count = single_object(quads, property_node, sh::MIN_COUNT)
        .and_then(|t| t.value().parse::<u32>().ok())
        .unwrap_or(0);
    let max_count = single_object(quads, property_node, sh::MAX_COUNT).and_then(|t| t.value().parse::<u32>().ok());

    let kind = if let Some(class) = single_object(quads, property_node, sh::CLASS) {
        match class.as_named() {
            Some(rdfl::CBD) => FieldKind::ConciseBoundedDescription,
            Some(rdfl::CONTEXT) => FieldKind::Context,
            Some(rdfl::PATH_LENS) => FieldKind::PathLens,
            _ => FieldKind::Class(class),
        }
    } else if let Some(datatype) = single_object(quads, property_node, sh::DATATYPE) {
        FieldKind::Datatype(datatype)
    } else {
        return Err(LensError::new(
            ErrorKind::Message(format!("{property_node} has neither sh:class nor sh:datatype")),
            vec![],
        ));
    };

    Ok(ShapeField {
        name,
        path_node,
        kind,
        min_count,
        max_count,
    })
}

fn single_object(quads: &[Quad], subject: &Term, predicate: &str) -> Option<Term> {
    quads
        .iter()
        .find(|q| &q.subject == subject && q.predicate.as_named() == Some(predicate))
        .map(|q| q.object.clone())
}

/// Evaluates one field against `focus`, enforcing its cardinality and
/// dispatching `sh:class` values back through `extract_one` (supplied by
/// `crate::typed_extract`, passed in to avoid a cyclic module dependency).
pub fn extract_field<F>(
    field: &ShapeField,
    focus: &Container<Term>,
    ctx: &RunContext,
    mut extract_one: F,
) -> Result<Value, LensError>
where
    F: FnMut(&Term, &Container<Term>, &RunContext) -> Result<Value, LensError>,
{
    let path = field.compiled_path()?;
    let matches = path.execute(focus, ctx)?;

    if matches.len() < field.min_count as usize {
        return Err(LensError::cardinality(
            field.min_count,
            field.max_count,
            matches.len(),
            ctx.lineage_snapshot(),
        ));
    }
    if let Some(max) = field.max_count {
        if matches.len() > max as usize {
            return Err(LensError::cardinality(
                field.min_count,
                field.max_count,
                matches.len(),
                ctx.lineage_snapshot(),
            ));
        }
    }

    let mut values = Vec::with_capacity(matches.len());
    for m in &matches {
        let value = match &field.kind {
            FieldKind::Class(class) => extract_one(class, m, ctx)?,
            FieldKind::Datatype(_) => Coerce.execute(m, ctx)?,
            FieldKind::ConciseBoundedDescription => Value::Quads(concise_bounded_description(m)),
            FieldKind::Context => Value::Quads(context_quads(m)),
            FieldKind::PathLens => Value::Lens(field.compiled_path()?),
        };
        values.push(value);
    }

    shape_value(values, field.min_count, field.max_count)
}

fn shape_value(mut values: Vec<Value>, _min_count: u32, max_count: Option<u32>) -> Result<Value, LensError> {
    if max_count == Some(1) {
        return Ok(if values.is_empty() { Value::Unit } else { values.remove(0) });
    }
    Ok(Value::List(values))
}

fn concise_bounded_description(focus: &Container<Term>) -> Vec<Quad> {
    let mut out = Vec::new();
    let mut frontier = vec![focus.id.clone()];
    let mut visited = std::collections::HashSet::new();
    while let Some(node) = frontier.pop() {
        if !visited.insert(node.clone()) {
            continue;
        }
        for q in focus.quads.iter().filter(|q| q.subject == node) {
            out.push(q.clone());
            if matches!(q.object, Term::BlankNode(_)) {
                frontier.push(q.object.clone());
            }
        }
    }
    out
}

fn context_quads(focus: &Container<Term>) -> Vec<Quad> {
    focus
        .quads
        .iter()
        .filter(|q| q.subject == focus.id || q.object == focus.id)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_quads() -> Vec<Quad> {
        vec![
            Quad::new(Term::named("shape:Person"), Term::named(rdf::TYPE), Term::named(sh::NODE_SHAPE)),
            Quad::new(Term::named("shape:Person"), Term::named(sh::TARGET_CLASS), Term::named("ex:Person")),
            Quad::new(Term::named("shape:Person"), Term::named(sh::PROPERTY), Term::blank("nameProp")),
            Quad::new(Term::blank("nameProp"), Term::named(sh::PATH), Term::named("ex:name")),
            Quad::new(Term::blank("nameProp"), Term::named(sh::NAME), Term::string("name")),
            Quad::new(Term::blank("nameProp"), Term::named(sh::DATATYPE), Term::named(crate::vocab::xsd::STRING)),
            Quad::new(Term::blank("nameProp"), Term::named(sh::MIN_COUNT), Term::literal("1", crate::vocab::xsd::INTEGER)),
            Quad::new(Term::blank("nameProp"), Term::named(sh::MAX_COUNT), Term::literal("1", crate::vocab::xsd::INTEGER)),
        ]
    }

    #[test]
    fn extracts_shape_with_one_scalar_field() {
        let quads = sample_quads();
        let shapes = extract_shapes(&quads).unwrap();
        let shape = shapes.shape_for(&Term::named("ex:Person")).unwrap();
        assert_eq!(shape.fields.len(), 1);
        assert_eq!(shape.fields[0].name, "name");
    }
}
