//! Rendering templates into their destination files.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Mapping;
use thiserror::Error;
use tracing::{debug, info};

use crate::render::{render_str, RenderError, UndefinedPolicy};

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("template file does not exist: {}", .0.display())]
    Missing(PathBuf),

    #[error("template path is not a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("failed to read template file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render template {}: {source}", .path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: RenderError,
    },

    #[error("destination already exists: {} (use --force to overwrite)", .0.display())]
    DestinationExists(PathBuf),

    #[error("destination exists and is not a file: {}", .0.display())]
    DestinationNotAFile(PathBuf),

    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write rendered file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid file mode '{0}' (expected an octal value like 644)")]
    BadMode(String),

    #[error("failed to set file mode on {}: {source}", .path.display())]
    SetMode {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove template file {}: {source}", .path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A template file to render into a destination file.
#[derive(Debug, Clone)]
pub struct TemplateFile {
    pub src: PathBuf,
    pub dest: PathBuf,
    /// Octal mode string applied to the rendered file (unix only).
    pub file_mode: Option<String>,
    /// Delete the template file after a successful render.
    pub remove_template: bool,
    /// Overwrite an existing destination file.
    pub force_overwrite: bool,
}

impl TemplateFile {
    /// Render this template against `namespace` and write the result.
    pub fn render(&self, namespace: &Mapping, policy: UndefinedPolicy) -> Result<(), OutputError> {
        if !self.src.exists() {
            return Err(OutputError::Missing(self.src.clone()));
        }
        if !self.src.is_file() {
            return Err(OutputError::NotAFile(self.src.clone()));
        }

        debug!("loading template file: {}", self.src.display());
        let content = fs::read_to_string(&self.src)
            .map_err(|e| OutputError::Io { path: self.src.clone(), source: e })?;

        debug!("rendering template file");
        let mut rendered = render_str(&content, namespace, policy)
            .map_err(|e| OutputError::Render { path: self.src.clone(), source: e })?;
        if !rendered.ends_with('\n') {
            rendered.push('\n');
        }

        self.write_rendered(&rendered)?;
        info!("created file '{}' from '{}'", self.dest.display(), self.src.display());

        if self.remove_template {
            debug!("removing template file: {}", self.src.display());
            fs::remove_file(&self.src)
                .map_err(|e| OutputError::Remove { path: self.src.clone(), source: e })?;
        }
        Ok(())
    }

    fn write_rendered(&self, content: &str) -> Result<(), OutputError> {
        if self.dest.exists() {
            if !self.dest.is_file() {
                return Err(OutputError::DestinationNotAFile(self.dest.clone()));
            }
            if !self.force_overwrite {
                return Err(OutputError::DestinationExists(self.dest.clone()));
            }
        } else if let Some(parent) = self.dest.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| OutputError::CreateDir { path: parent.to_path_buf(), source: e })?;
            }
        }

        debug!("saving rendered file to: {}", self.dest.display());
        fs::write(&self.dest, content)
            .map_err(|e| OutputError::Write { path: self.dest.clone(), source: e })?;

        if let Some(ref mode) = self.file_mode {
            set_file_mode(&self.dest, mode)?;
        }
        Ok(())
    }
}

fn set_file_mode(path: &Path, mode: &str) -> Result<(), OutputError> {
    let bits =
        u32::from_str_radix(mode, 8).map_err(|_| OutputError::BadMode(mode.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        debug!("setting file mode {mode} on {}", path.display());
        fs::set_permissions(path, fs::Permissions::from_mode(bits))
            .map_err(|e| OutputError::SetMode { path: path.to_path_buf(), source: e })?;
    }
    #[cfg(not(unix))]
    let _ = (bits, path);

    Ok(())
}
