//! Folding context sources into the final render namespace.

use std::path::PathBuf;

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::defaults::{resolve, Variables};
use crate::merge::{mapping_from_vars, merge_mappings};

use super::source::{ContextError, ContextSource, LoadOptions};

/// Reserved top-level key under which the ambient variables are re-exposed,
/// so templates can address them even when a source shadows a name.
pub const AMBIENT_KEY: &str = "env";

/// The aggregated variable namespace handed to the render engine.
#[derive(Debug, Clone, Default)]
pub struct Context {
    namespace: Mapping,
}

impl Context {
    /// Load every context file in order and fold it into one namespace.
    pub fn from_files(
        paths: &[PathBuf],
        options: &LoadOptions,
        vars: &Variables,
    ) -> Result<Self, ContextError> {
        let sources = paths
            .iter()
            .map(|path| ContextSource::load(path, options, vars))
            .collect::<Result<Vec<_>, _>>()?;
        Self::build(&sources, vars, options.strict_types)
    }

    /// Fold loaded sources into a namespace.
    ///
    /// The namespace starts from the ambient variables; each source then
    /// contributes its declared variables overlaid with its resolved
    /// defaults, later sources overriding earlier ones on conflicting
    /// keys. Defaults always resolve against the ambient variables, never
    /// against what earlier sources contributed.
    pub fn build(
        sources: &[ContextSource],
        vars: &Variables,
        strict: bool,
    ) -> Result<Self, ContextError> {
        let mut namespace = mapping_from_vars(vars);

        for source in sources {
            debug!("folding context from {}", source.path.display());
            let resolved = resolve(&source.defaults, vars, strict)
                .map_err(|e| ContextError::Resolve { path: source.path.clone(), source: e })?;
            let contributed = merge_mappings(&source.declared, &resolved);
            namespace = merge_mappings(&namespace, &contributed);
        }

        let mut ambient = Mapping::new();
        ambient.insert(Value::from(AMBIENT_KEY), Value::Mapping(mapping_from_vars(vars)));
        namespace = merge_mappings(&namespace, &ambient);

        Ok(Self { namespace })
    }

    pub fn namespace(&self) -> &Mapping {
        &self.namespace
    }

    pub fn into_namespace(self) -> Mapping {
        self.namespace
    }
}
