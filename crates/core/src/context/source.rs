//! Loading and parsing of a single context file.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use thiserror::Error;
use tracing::debug;

use crate::defaults::{DefaultsSpec, ResolveError, SpecError, Variables};
use crate::merge::mapping_from_vars;
use crate::render::{render_str, RenderError, UndefinedPolicy};

/// Options governing how context sources are loaded and resolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Render the document with the ambient variables before parsing it.
    pub prerender: bool,
    /// Policy for undefined variables during the prerender pass.
    pub undefined: UndefinedPolicy,
    /// Fail on supplied values that cannot be coerced to their declared type.
    pub strict_types: bool,
}

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("context file does not exist: {}", .0.display())]
    Missing(PathBuf),

    #[error("context path is not a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("failed to read context file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to prerender context file {}: {source}", .path.display())]
    Prerender {
        path: PathBuf,
        #[source]
        source: RenderError,
    },

    /// The underlying error carries line/column when the parser knows them.
    #[error("failed to parse YAML in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("context file {} must contain a top-level mapping", .path.display())]
    TopLevel { path: PathBuf },

    #[error("invalid defaults in {}: {source}", .path.display())]
    Spec {
        path: PathBuf,
        #[source]
        source: SpecError,
    },

    #[error("failed to resolve defaults in {}: {source}", .path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: ResolveError,
    },
}

/// One loaded context document: raw text, declared variables (sans the
/// reserved `defaults` key), and its parsed defaults specification.
///
/// Immutable after loading; discarded once folded into the aggregate.
#[derive(Debug, Clone)]
pub struct ContextSource {
    pub path: PathBuf,
    pub raw: String,
    pub declared: Mapping,
    pub defaults: DefaultsSpec,
}

impl ContextSource {
    pub fn load(
        path: &Path,
        options: &LoadOptions,
        vars: &Variables,
    ) -> Result<Self, ContextError> {
        if !path.exists() {
            return Err(ContextError::Missing(path.to_path_buf()));
        }
        if !path.is_file() {
            return Err(ContextError::NotAFile(path.to_path_buf()));
        }

        debug!("loading context file: {}", path.display());
        let raw = fs::read_to_string(path)
            .map_err(|e| ContextError::Io { path: path.to_path_buf(), source: e })?;

        let text = if options.prerender {
            debug!("prerendering context file");
            let ambient = mapping_from_vars(vars);
            render_str(&raw, &ambient, options.undefined)
                .map_err(|e| ContextError::Prerender { path: path.to_path_buf(), source: e })?
        } else {
            raw.clone()
        };

        debug!("parsing context file");
        let document: Value = serde_yaml::from_str(&text)
            .map_err(|e| ContextError::Parse { path: path.to_path_buf(), source: e })?;

        let mut declared = match document {
            // an empty document declares nothing
            Value::Null => Mapping::new(),
            Value::Mapping(mapping) => mapping,
            _ => return Err(ContextError::TopLevel { path: path.to_path_buf() }),
        };

        let defaults = match declared.remove(Value::from("defaults")) {
            Some(block) => DefaultsSpec::from_value(&block)
                .map_err(|e| ContextError::Spec { path: path.to_path_buf(), source: e })?,
            None => DefaultsSpec::default(),
        };

        Ok(Self { path: path.to_path_buf(), raw, declared, defaults })
    }
}
