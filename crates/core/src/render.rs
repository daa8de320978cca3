//! Minimal `{{var}}` substitution engine.
//!
//! Supports:
//! - Simple variables: `{{name}}`
//! - Dotted paths into nested mappings: `{{env.HOME}}`
//! - Filters: `{{name | filter}}` (mandatory, slugify, lower, upper, trim)
//!
//! Undefined variables are handled according to an explicit
//! [`UndefinedPolicy`] passed at the call site.

use regex::Regex;
use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// How the engine treats a placeholder that names no known variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UndefinedPolicy {
    /// Fail rendering with [`RenderError::Undefined`].
    #[default]
    Strict,
    /// Substitute an empty string.
    Silent,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid placeholder pattern: {0}")]
    Regex(String),

    #[error("undefined variable '{0}'")]
    Undefined(String),

    #[error("undefined variable '{0}' is mandatory")]
    Mandatory(String),

    #[error("unknown filter '{0}'")]
    UnknownFilter(String),
}

/// Render a template string against a variable namespace.
pub fn render_str(
    template: &str,
    namespace: &Mapping,
    policy: UndefinedPolicy,
) -> Result<String, RenderError> {
    let re = Regex::new(r"\{\{([^{}]+)\}\}").map_err(|e| RenderError::Regex(e.to_string()))?;

    let mut rendered = String::with_capacity(template.len());
    let mut last = 0;
    for caps in re.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        rendered.push_str(&template[last..whole.start()]);
        rendered.push_str(&eval_expr(caps[1].trim(), namespace, policy)?);
        last = whole.end();
    }
    rendered.push_str(&template[last..]);
    Ok(rendered)
}

fn eval_expr(
    expr: &str,
    namespace: &Mapping,
    policy: UndefinedPolicy,
) -> Result<String, RenderError> {
    let (path, filter) = match expr.split_once('|') {
        Some((path, filter)) => (path.trim(), Some(filter.trim())),
        None => (expr, None),
    };

    match lookup(namespace, path) {
        Some(value) => {
            let text = display_value(value);
            match filter {
                Some(name) => apply_filter(&text, name),
                None => Ok(text),
            }
        }
        None => match (filter, policy) {
            // mandatory fails regardless of the undefined policy
            (Some("mandatory"), _) => Err(RenderError::Mandatory(path.to_string())),
            (_, UndefinedPolicy::Strict) => Err(RenderError::Undefined(path.to_string())),
            (_, UndefinedPolicy::Silent) => Ok(String::new()),
        },
    }
}

/// Walk a dotted path through nested mappings.
fn lookup<'a>(namespace: &'a Mapping, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = namespace.get(Value::from(segments.next()?))?;
    for segment in segments {
        current = current.as_mapping()?.get(Value::from(segment))?;
    }
    Some(current)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => serde_yaml::to_string(other).unwrap_or_default().trim_end().to_string(),
    }
}

fn apply_filter(value: &str, filter: &str) -> Result<String, RenderError> {
    match filter {
        // a defined value passes through mandatory untouched
        "mandatory" => Ok(value.to_string()),
        "slugify" => Ok(slugify(value)),
        "lowercase" | "lower" => Ok(value.to_lowercase()),
        "uppercase" | "upper" => Ok(value.to_uppercase()),
        "trim" => Ok(value.trim().to_string()),
        other => Err(RenderError::UnknownFilter(other.to_string())),
    }
}

/// Convert a string to a URL-friendly slug: lowercase, spaces and
/// underscores become hyphens, everything else non-alphanumeric is dropped.
fn slugify(s: &str) -> String {
    let mut result = String::with_capacity(s.len());

    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
        } else if (c == ' ' || c == '_' || c == '-') && !result.ends_with('-') {
            result.push('-');
        }
    }

    result.trim_matches('-').to_string()
}
