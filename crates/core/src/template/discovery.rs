//! Template discovery and destination planning.

use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

/// File extension marking a template file.
pub const TEMPLATE_EXTENSION: &str = "tpl";

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("no template files (*.tpl) found in given path(s)")]
    NoTemplates,

    #[error("failed to read directory {0}: {1}")]
    Walk(String, #[source] walkdir::Error),

    #[error("destination exists and is not a directory: {} (required when rendering multiple templates)", .0.display())]
    DestinationNotADirectory(PathBuf),
}

/// A single template paired with the destination it renders to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateJob {
    pub src: PathBuf,
    pub dest: PathBuf,
}

/// Pair every template with its destination path.
///
/// With multiple templates, or a directory source, the destination must be
/// a directory: directory sources keep their relative layout below it,
/// explicit files land directly in it, and the `.tpl` extension is
/// stripped either way. A single file template may target a file path or
/// an existing directory.
pub fn plan_jobs(templates: &[PathBuf], destination: &Path) -> Result<Vec<TemplateJob>, PlanError> {
    let multi = templates.len() > 1 || templates.first().is_some_and(|p| p.is_dir());

    let mut jobs = Vec::new();
    if multi {
        if destination.exists() && !destination.is_dir() {
            return Err(PlanError::DestinationNotADirectory(destination.to_path_buf()));
        }
        for path in templates {
            if path.is_dir() {
                for relative in template_files_in(path)? {
                    jobs.push(TemplateJob {
                        src: path.join(&relative),
                        dest: destination.join(strip_template_extension(&relative)),
                    });
                }
            } else {
                jobs.push(TemplateJob {
                    src: path.clone(),
                    dest: destination.join(file_name_sans_extension(path)),
                });
            }
        }
    } else if let Some(single) = templates.first() {
        let dest = if destination.is_dir() {
            destination.join(file_name_sans_extension(single))
        } else {
            destination.to_path_buf()
        };
        jobs.push(TemplateJob { src: single.clone(), dest });
    }

    if jobs.is_empty() {
        return Err(PlanError::NoTemplates);
    }
    Ok(jobs)
}

/// Relative paths of the `*.tpl` files below `dir`, sorted.
fn template_files_in(dir: &Path) -> Result<Vec<PathBuf>, PlanError> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.map_err(|e| PlanError::Walk(dir.display().to_string(), e))?;
        let path = entry.path();
        if path.is_file() && is_template_file(path) {
            found.push(path.strip_prefix(dir).unwrap_or(path).to_path_buf());
        }
    }

    found.sort();
    Ok(found)
}

fn is_template_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == TEMPLATE_EXTENSION)
}

fn strip_template_extension(path: &Path) -> PathBuf {
    if is_template_file(path) {
        path.with_extension("")
    } else {
        path.to_path_buf()
    }
}

fn file_name_sans_extension(path: &Path) -> PathBuf {
    let stripped = strip_template_extension(path);
    stripped.file_name().map_or(stripped.clone(), PathBuf::from)
}
