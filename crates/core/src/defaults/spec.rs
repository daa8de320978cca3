//! Validation of the `defaults` block into typed declarations.

use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Errors raised while building a [`DefaultsSpec`] from a parsed document.
///
/// These fire at load time, before any variable is resolved: a malformed
/// declaration is rejected even if the variable is never referenced.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("'defaults' must be a mapping with at least one entry")]
    NotAMapping,

    #[error("default variable names must be strings")]
    NonStringName,

    #[error("default for '{0}' must not be null")]
    NullDefault(String),

    #[error("variable '{name}': special defaults require the '{option}' option")]
    MissingOption { name: String, option: &'static str },

    #[error("variable '{name}': option '{option}' must be {expected}")]
    WrongOptionType {
        name: String,
        option: &'static str,
        expected: &'static str,
    },

    #[error("variable '{name}': unknown special default type '{kind}' (available types are: choice, list, variation)")]
    UnknownKind { name: String, kind: String },
}

/// How a single declared variable is defaulted and coerced.
///
/// The variant is picked once, from the type of the literal written in the
/// document, so resolution never has to re-inspect raw values.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultDecl {
    Str(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Literal sequence default; supplied raw values are parsed as JSON
    /// sequences.
    ListLiteral(Vec<Value>),
    /// Supplied value must match one of `choices`; the canonical spelling
    /// from the declaration wins on a caseless match.
    Choice {
        default: String,
        choices: Vec<String>,
        case_sensitive: bool,
        strip: bool,
    },
    /// Supplied value is split on `delimiter` into a sequence of strings.
    DelimitedList {
        default: Vec<String>,
        delimiter: String,
        strip: bool,
    },
    /// Nested defaults, resolved only when the trigger variable is present.
    Variation(DefaultsSpec),
}

/// An ordered defaults specification, as extracted from one context
/// document. Document order is preserved so resolution output is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultsSpec {
    entries: Vec<(String, DefaultDecl)>,
}

impl DefaultsSpec {
    /// Build a spec from the payload of the reserved `defaults` key.
    pub fn from_value(value: &Value) -> Result<Self, SpecError> {
        match value.as_mapping() {
            Some(map) if !map.is_empty() => Self::from_mapping(map),
            _ => Err(SpecError::NotAMapping),
        }
    }

    fn from_mapping(map: &Mapping) -> Result<Self, SpecError> {
        let mut entries = Vec::with_capacity(map.len());
        for (key, declared) in map {
            let name = key.as_str().ok_or(SpecError::NonStringName)?;
            entries.push((name.to_string(), DefaultDecl::from_value(name, declared)?));
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[(String, DefaultDecl)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl DefaultDecl {
    /// Build a declaration from the literal found in a `defaults` block,
    /// dispatching on the literal's own type.
    pub fn from_value(name: &str, value: &Value) -> Result<Self, SpecError> {
        match value {
            Value::Null => Err(SpecError::NullDefault(name.to_string())),
            Value::String(s) => Ok(DefaultDecl::Str(s.clone())),
            Value::Bool(b) => Ok(DefaultDecl::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(DefaultDecl::Int(i)),
                None => Ok(DefaultDecl::Float(n.as_f64().unwrap_or_default())),
            },
            Value::Sequence(seq) => Ok(DefaultDecl::ListLiteral(seq.clone())),
            Value::Mapping(options) => Self::from_options(name, options),
            Value::Tagged(tagged) => Self::from_value(name, &tagged.value),
        }
    }

    /// Build one of the special declarations (`type: choice|list|variation`).
    fn from_options(name: &str, options: &Mapping) -> Result<Self, SpecError> {
        let kind = match options.get(Value::from("type")) {
            Some(Value::String(s)) => s.as_str(),
            Some(_) => {
                return Err(SpecError::WrongOptionType {
                    name: name.to_string(),
                    option: "type",
                    expected: "a string",
                })
            }
            None => {
                return Err(SpecError::MissingOption { name: name.to_string(), option: "type" })
            }
        };

        match kind {
            "choice" => Ok(DefaultDecl::Choice {
                default: require_str(name, options, "default")?,
                choices: require_str_seq(name, options, "choices")?,
                case_sensitive: optional_bool(name, options, "case_sensitive")?.unwrap_or(false),
                strip: optional_bool(name, options, "strip")?.unwrap_or(true),
            }),
            "list" => Ok(DefaultDecl::DelimitedList {
                default: require_str_seq(name, options, "default")?,
                delimiter: require_str(name, options, "delimiter")?,
                strip: optional_bool(name, options, "strip")?.unwrap_or(true),
            }),
            "variation" => match options.get(Value::from("defaults")) {
                Some(nested @ Value::Mapping(_)) => {
                    Ok(DefaultDecl::Variation(DefaultsSpec::from_value(nested)?))
                }
                Some(_) => Err(SpecError::WrongOptionType {
                    name: name.to_string(),
                    option: "defaults",
                    expected: "a mapping",
                }),
                None => {
                    Err(SpecError::MissingOption { name: name.to_string(), option: "defaults" })
                }
            },
            other => {
                Err(SpecError::UnknownKind { name: name.to_string(), kind: other.to_string() })
            }
        }
    }
}

fn require_str(name: &str, options: &Mapping, option: &'static str) -> Result<String, SpecError> {
    match options.get(Value::from(option)) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(SpecError::WrongOptionType {
            name: name.to_string(),
            option,
            expected: "a string",
        }),
        None => Err(SpecError::MissingOption { name: name.to_string(), option }),
    }
}

fn require_str_seq(
    name: &str,
    options: &Mapping,
    option: &'static str,
) -> Result<Vec<String>, SpecError> {
    let wrong = || SpecError::WrongOptionType {
        name: name.to_string(),
        option,
        expected: "a list of strings",
    };

    match options.get(Value::from(option)) {
        Some(Value::Sequence(seq)) => seq
            .iter()
            .map(|item| item.as_str().map(ToOwned::to_owned).ok_or_else(wrong))
            .collect(),
        Some(_) => Err(wrong()),
        None => Err(SpecError::MissingOption { name: name.to_string(), option }),
    }
}

fn optional_bool(
    name: &str,
    options: &Mapping,
    option: &'static str,
) -> Result<Option<bool>, SpecError> {
    match options.get(Value::from(option)) {
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(SpecError::WrongOptionType {
            name: name.to_string(),
            option,
            expected: "a boolean",
        }),
        None => Ok(None),
    }
}
