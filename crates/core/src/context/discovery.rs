//! Discovery of context files from path arguments.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("no context files (*.yml, *.yaml) found in given path(s)")]
    NoContextFiles,

    #[error("failed to read directory {0}: {1}")]
    Walk(String, #[source] walkdir::Error),
}

/// Expand context path arguments into a flat, ordered list of files.
///
/// File paths are kept as given (a missing file surfaces when it is
/// loaded); directories contribute their `*.yml`/`*.yaml` files
/// recursively, sorted, so layering stays deterministic.
pub fn collect_context_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, DiscoveryError> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(context_files_in(path)?);
        } else {
            files.push(path.clone());
        }
    }

    if !paths.is_empty() && files.is_empty() {
        return Err(DiscoveryError::NoContextFiles);
    }
    Ok(files)
}

fn context_files_in(dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.map_err(|e| DiscoveryError::Walk(dir.display().to_string(), e))?;
        let path = entry.path();
        if path.is_file() && is_context_file(path) {
            found.push(path.to_path_buf());
        }
    }

    found.sort();
    debug!("found {} context file(s) under {}", found.len(), dir.display());
    Ok(found)
}

fn is_context_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == "yml" || e == "yaml")
}
