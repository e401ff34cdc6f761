//! XSD datatype coercion and environment-variable lensing (§4.F).

use crate::container::Container;
use crate::context::RunContext;
use crate::error::{ErrorKind, LensError};
use crate::lens::SingleLens;
use crate::record::Value;
use crate::term::Term;
use crate::vocab::xsd;

/// Coerces a literal focus to the scalar [`Value`] its datatype implies.
/// Unrecognised datatypes pass through as a plain string — callers that need
/// strictness about datatype coverage should check `sh:datatype` themselves
/// before invoking this.
pub struct Coerce;

impl SingleLens<Container<Term>, Value> for Coerce {
    fn execute(&self, focus: &Container<Term>, ctx: &RunContext) -> Result<Value, LensError> {
        let literal = focus.id.as_literal().ok_or_else(|| {
            LensError::new(
                ErrorKind::WrongType {
                    expected: "literal".into(),
                    found: format!("{:?}", focus.id),
                },
                ctx.lineage_snapshot(),
            )
        })?;

        let datatype: &str = &literal.datatype;
        match datatype {
            xsd::INTEGER => literal
                .lexical
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|e| parse_error(&literal.lexical, "xsd:integer", e, ctx)),
            xsd::FLOAT | xsd::DOUBLE | xsd::DECIMAL => literal
                .lexical
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| parse_error(&literal.lexical, "xsd:float", e, ctx)),
            xsd::BOOLEAN => match literal.lexical.as_ref() {
                "true" | "1" => Ok(Value::Bool(true)),
                "false" | "0" => Ok(Value::Bool(false)),
                other => Err(LensError::new(
                    ErrorKind::WrongType {
                        expected: "xsd:boolean".into(),
                        found: other.to_string(),
                    },
                    ctx.lineage_snapshot(),
                )),
            },
            xsd::DATE_TIME => chrono::DateTime::parse_from_rfc3339(&literal.lexical)
                .map(|dt| Value::DateTime(dt.with_timezone(&chrono::Utc)))
                .map_err(|e| parse_error(&literal.lexical, "xsd:dateTime", e, ctx)),
            _ => Ok(Value::String(literal.lexical.to_string())),
        }
    }
}

fn parse_error(
    lexical: &str,
    datatype: &str,
    source: impl std::fmt::Display,
    ctx: &RunContext,
) -> LensError {
    LensError::new(
        ErrorKind::WrongType {
            expected: datatype.into(),
            found: format!("{lexical:?} ({source})"),
        },
        ctx.lineage_snapshot(),
    )
}

/// `envLens(key, default?)`: resolves `focus`'s lexical value as an
/// environment-variable key, falling back to `default`, per §4.F/§4.J.
pub struct EnvLens {
    default: Option<String>,
}

impl EnvLens {
    pub fn new(default: Option<String>) -> Self {
        Self { default }
    }
}

impl SingleLens<Container<Term>, Value> for EnvLens {
    fn execute(&self, focus: &Container<Term>, ctx: &RunContext) -> Result<Value, LensError> {
        let key = focus.id.value();
        match ctx.env(key) {
            Some(value) => Ok(Value::String(value.to_string())),
            None => match &self.default {
                Some(default) => Ok(Value::String(default.clone())),
                None => Err(LensError::new(ErrorKind::EnvUnresolved, ctx.lineage_snapshot())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn coerces_integer_literal() {
        let container = Container::root(Term::literal("42", xsd::INTEGER), vec![]);
        let ctx = RunContext::new(HashMap::new());
        assert!(matches!(Coerce.execute(&container, &ctx).unwrap(), Value::Int(42)));
    }

    #[test]
    fn unrecognised_datatype_passes_through_as_string() {
        let container = Container::root(Term::literal("x", "urn:custom"), vec![]);
        let ctx = RunContext::new(HashMap::new());
        assert!(matches!(Coerce.execute(&container, &ctx).unwrap(), Value::String(s) if s == "x"));
    }

    #[test]
    fn env_lens_falls_back_to_default() {
        let container = Container::root(Term::string("MISSING_KEY"), vec![]);
        let ctx = RunContext::new(HashMap::new());
        let lens = EnvLens::new(Some("fallback".into()));
        assert!(matches!(lens.execute(&container, &ctx).unwrap(), Value::String(s) if s == "fallback"));
    }

    #[test]
    fn env_lens_errors_without_default_or_value() {
        let container = Container::root(Term::string("MISSING_KEY"), vec![]);
        let ctx = RunContext::new(HashMap::new());
        let lens = EnvLens::new(None);
        assert!(matches!(
            lens.execute(&container, &ctx).unwrap_err().kind,
            ErrorKind::EnvUnresolved
        ));
    }
}
