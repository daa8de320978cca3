//! Resolution of a [`DefaultsSpec`] against the ambient variables.

use std::collections::HashMap;

use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::merge::merge_mappings;

use super::spec::{DefaultDecl, DefaultsSpec};

/// Ambient variables: the process environment merged with command-line
/// overrides. Raw values are always strings; the declarations drive any
/// coercion.
pub type Variables = HashMap<String, String>;

const BOOL_TRUE: [&str; 5] = ["true", "1", "t", "y", "yes"];
const BOOL_FALSE: [&str; 5] = ["false", "0", "f", "n", "no"];

/// A supplied raw value could not be coerced to its declared type.
///
/// Raised only under strict type checking; in lenient mode the raw value
/// is passed through unchanged instead.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("variable '{0}' must be of type 'bool'")]
    Bool(String),

    #[error("variable '{0}' must be of type 'int'")]
    Int(String),

    #[error("variable '{0}' must be of type 'float'")]
    Float(String),

    #[error("variable '{0}' must be a sequence in JSON format")]
    List(String),

    #[error("variable '{name}': '{given}' is not an available choice ({})", .choices.join(", "))]
    Choice {
        name: String,
        given: String,
        choices: Vec<String>,
    },
}

/// Resolve every declaration in `spec` into a concrete value.
///
/// Declarations only ever read the ambient `vars`, never each other's
/// resolved values, so the outcome does not depend on resolution order.
/// Variation blocks contribute their nested resolution as a merge rather
/// than an assignment; all other declarations bind their own name.
pub fn resolve(
    spec: &DefaultsSpec,
    vars: &Variables,
    strict: bool,
) -> Result<Mapping, ResolveError> {
    let mut resolved = Mapping::new();

    for (name, decl) in spec.entries() {
        let value = match (decl, vars.get(name)) {
            (DefaultDecl::Variation(nested), Some(_)) => {
                let sub = resolve(nested, vars, strict)?;
                resolved = merge_mappings(&resolved, &sub);
                continue;
            }
            (DefaultDecl::Variation(_), None) => continue,
            (decl, None) => default_value(decl),
            (DefaultDecl::Str(_), Some(raw)) => Value::String(raw.clone()),
            (DefaultDecl::Bool(_), Some(raw)) => parse_bool(name, raw, strict)?,
            (DefaultDecl::Int(_), Some(raw)) => parse_int(name, raw, strict)?,
            (DefaultDecl::Float(_), Some(raw)) => parse_float(name, raw, strict)?,
            (DefaultDecl::ListLiteral(_), Some(raw)) => parse_list(name, raw, strict)?,
            (DefaultDecl::Choice { choices, case_sensitive, strip, .. }, Some(raw)) => {
                pick_choice(name, raw, choices, *case_sensitive, *strip, strict)?
            }
            (DefaultDecl::DelimitedList { delimiter, strip, .. }, Some(raw)) => {
                split_list(raw, delimiter, *strip)
            }
        };
        resolved.insert(Value::String(name.clone()), value);
    }

    Ok(resolved)
}

/// The value a declaration falls back to when its variable is absent.
fn default_value(decl: &DefaultDecl) -> Value {
    match decl {
        DefaultDecl::Str(s) => Value::String(s.clone()),
        DefaultDecl::Bool(b) => Value::Bool(*b),
        DefaultDecl::Int(i) => Value::from(*i),
        DefaultDecl::Float(f) => Value::from(*f),
        DefaultDecl::ListLiteral(items) => Value::Sequence(items.clone()),
        DefaultDecl::Choice { default, .. } => Value::String(default.clone()),
        DefaultDecl::DelimitedList { default, .. } => {
            Value::Sequence(default.iter().cloned().map(Value::String).collect())
        }
        // variations contribute through merging, never through a fallback
        DefaultDecl::Variation(_) => Value::Null,
    }
}

fn parse_bool(name: &str, raw: &str, strict: bool) -> Result<Value, ResolveError> {
    let token = raw.trim().to_lowercase();
    if BOOL_TRUE.contains(&token.as_str()) {
        Ok(Value::Bool(true))
    } else if BOOL_FALSE.contains(&token.as_str()) {
        Ok(Value::Bool(false))
    } else if strict {
        Err(ResolveError::Bool(name.to_string()))
    } else {
        Ok(Value::String(raw.to_string()))
    }
}

fn parse_int(name: &str, raw: &str, strict: bool) -> Result<Value, ResolveError> {
    match raw.trim().parse::<i64>() {
        Ok(i) => Ok(Value::from(i)),
        Err(_) if strict => Err(ResolveError::Int(name.to_string())),
        Err(_) => Ok(Value::String(raw.to_string())),
    }
}

fn parse_float(name: &str, raw: &str, strict: bool) -> Result<Value, ResolveError> {
    match raw.trim().parse::<f64>() {
        Ok(f) => Ok(Value::from(f)),
        Err(_) if strict => Err(ResolveError::Float(name.to_string())),
        Err(_) => Ok(Value::String(raw.to_string())),
    }
}

fn parse_list(name: &str, raw: &str, strict: bool) -> Result<Value, ResolveError> {
    match serde_json::from_str::<Vec<serde_json::Value>>(raw.trim()) {
        Ok(items) => Ok(Value::Sequence(items.into_iter().map(json_to_yaml).collect())),
        Err(_) if strict => Err(ResolveError::List(name.to_string())),
        Err(_) => Ok(Value::String(raw.to_string())),
    }
}

fn json_to_yaml(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::from(i),
            None => Value::from(n.as_f64().unwrap_or_default()),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => {
            Value::Sequence(items.into_iter().map(json_to_yaml).collect())
        }
        serde_json::Value::Object(map) => {
            let mut mapping = Mapping::new();
            for (key, item) in map {
                mapping.insert(Value::String(key), json_to_yaml(item));
            }
            Value::Mapping(mapping)
        }
    }
}

fn pick_choice(
    name: &str,
    raw: &str,
    choices: &[String],
    case_sensitive: bool,
    strip: bool,
    strict: bool,
) -> Result<Value, ResolveError> {
    let candidate = if strip { raw.trim() } else { raw };

    let matched = if case_sensitive {
        choices.iter().find(|choice| choice.as_str() == candidate)
    } else {
        let lowered = candidate.to_lowercase();
        choices.iter().find(|choice| choice.to_lowercase() == lowered)
    };

    match matched {
        Some(choice) => Ok(Value::String(choice.clone())),
        None if strict => Err(ResolveError::Choice {
            name: name.to_string(),
            given: candidate.to_string(),
            choices: choices.to_vec(),
        }),
        None => Ok(Value::String(raw.to_string())),
    }
}

fn split_list(raw: &str, delimiter: &str, strip: bool) -> Value {
    // a naive split of the empty string would yield [""], not []
    if raw.is_empty() {
        return Value::Sequence(Vec::new());
    }

    let items = raw
        .split(delimiter)
        .map(|part| {
            let part = if strip { part.trim() } else { part };
            Value::String(part.to_string())
        })
        .collect();
    Value::Sequence(items)
}
