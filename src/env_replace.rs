//! Environment-variable resolution pass over the raw quad set (§4.J).
//!
//! A shape graph can embed `rdfl:EnvVariable` nodes wherever a literal is
//! expected: `[ a rdfl:EnvVariable ; rdfl:envKey "PORT" ; rdfl:envDefault
//! "8080" ]`. Before shape compilation sees the graph, [`resolve_env_vars`]
//! walks every quad, replaces any object that names such a node with the
//! resolved literal, and drops the now-orphaned `rdfl:EnvVariable`
//! description triples. This is a distinct, earlier pass from
//! [`crate::datatype::EnvLens`], which resolves a *data* value's lexical
//! form against the environment at extraction time — this pass resolves
//! variables baked into the *shape* graph itself before extraction starts.

use std::collections::{HashMap, HashSet};

use crate::error::{ErrorKind, LensError};
use crate::term::{Quad, Term};
use crate::vocab::rdf;
use crate::vocab::rdfl;

/// Replaces every `rdfl:EnvVariable` node reachable from `quads` with its
/// resolved literal value, returning the rewritten quad set.
pub fn resolve_env_vars(quads: &[Quad], env: &HashMap<String, String>) -> Result<Vec<Quad>, LensError> {
    let descriptors = collect_descriptors(quads)?;
    if descriptors.is_empty() {
        return Ok(quads.to_vec());
    }

    let mut resolved = HashMap::new();
    for (node, descriptor) in &descriptors {
        let value = match env.get(&descriptor.key) {
            Some(value) => value.clone(),
            None => descriptor
                .default
                .clone()
                .ok_or_else(|| LensError::new(ErrorKind::EnvUnresolved, vec![]))?,
        };
        resolved.insert(node.clone(), Term::string(value));
    }

    let orphaned_subjects: HashSet<Term> = descriptors.keys().cloned().collect();

    let mut out = Vec::with_capacity(quads.len());
    for q in quads {
        if orphaned_subjects.contains(&q.subject) {
            // Drop the descriptor triples (`a rdfl:EnvVariable`, `envKey`,
            // `envDefault`) themselves; they described the variable, not data.
            continue;
        }
        let object = resolved.get(&q.object).cloned().unwrap_or_else(|| q.object.clone());
        out.push(Quad::in_graph(q.subject.clone(), q.predicate.clone(), object, q.graph.clone()));
    }
    Ok(out)
}

struct EnvDescriptor {
    key: String,
    default: Option<String>,
}

fn collect_descriptors(quads: &[Quad]) -> Result<HashMap<Term, EnvDescriptor>, LensError> {
    let mut nodes = HashSet::new();
    for q in quads {
        if q.predicate.as_named() == Some(rdf::TYPE) && q.object.as_named() == Some(rdfl::ENV_VARIABLE) {
            nodes.insert(q.subject.clone());
        }
    }

    let mut descriptors = HashMap::new();
    for node in nodes {
        let key = quads
            .iter()
            .find(|q| q.subject == node && q.predicate.as_named() == Some(rdfl::ENV_KEY))
            .map(|q| q.object.value().to_string())
            .ok_or_else(|| {
                LensError::new(
                    ErrorKind::Message(format!("{node} is an rdfl:EnvVariable with no rdfl:envKey")),
                    vec![],
                )
            })?;
        let default = quads
            .iter()
            .find(|q| q.subject == node && q.predicate.as_named() == Some(rdfl::ENV_DEFAULT))
            .map(|q| q.object.value().to_string());
        descriptors.insert(node, EnvDescriptor { key, default });
    }
    Ok(descriptors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_env_variable_node_with_resolved_literal() {
        let quads = vec![
            Quad::new(Term::named("s"), Term::named("p"), Term::blank("envvar")),
            Quad::new(Term::blank("envvar"), Term::named(rdf::TYPE), Term::named(rdfl::ENV_VARIABLE)),
            Quad::new(Term::blank("envvar"), Term::named(rdfl::ENV_KEY), Term::string("PORT")),
            Quad::new(Term::blank("envvar"), Term::named(rdfl::ENV_DEFAULT), Term::string("8080")),
        ];
        let mut env = HashMap::new();
        env.insert("PORT".to_string(), "9090".to_string());

        let out = resolve_env_vars(&quads, &env).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].object, Term::string("9090"));
    }

    #[test]
    fn falls_back_to_default_when_env_missing() {
        let quads = vec![
            Quad::new(Term::named("s"), Term::named("p"), Term::blank("envvar")),
            Quad::new(Term::blank("envvar"), Term::named(rdf::TYPE), Term::named(rdfl::ENV_VARIABLE)),
            Quad::new(Term::blank("envvar"), Term::named(rdfl::ENV_KEY), Term::string("MISSING")),
            Quad::new(Term::blank("envvar"), Term::named(rdfl::ENV_DEFAULT), Term::string("fallback")),
        ];
        let out = resolve_env_vars(&quads, &HashMap::new()).unwrap();
        assert_eq!(out[0].object, Term::string("fallback"));
    }

    #[test]
    fn errors_without_env_or_default() {
        let quads = vec![
            Quad::new(Term::named("s"), Term::named("p"), Term::blank("envvar")),
            Quad::new(Term::blank("envvar"), Term::named(rdf::TYPE), Term::named(rdfl::ENV_VARIABLE)),
            Quad::new(Term::blank("envvar"), Term::named(rdfl::ENV_KEY), Term::string("MISSING")),
        ];
        assert!(matches!(
            resolve_env_vars(&quads, &HashMap::new()).unwrap_err().kind,
            ErrorKind::EnvUnresolved
        ));
    }
}
