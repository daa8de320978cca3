use std::path::{Path, PathBuf};
use std::{env, fs};

use dirs::home_dir;
use shellexpand::full;
use thiserror::Error;

use crate::config::types::{ConfigFile, FlagDefaults, ResolvedDefaults};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at {0}")]
    NotFound(String),

    #[error("failed to read config file {0}: {1}")]
    ReadError(String, #[source] std::io::Error),

    #[error("failed to parse TOML in {0}: {1}")]
    ParseError(String, #[source] toml::de::Error),

    #[error("version {0} is unsupported (expected 1)")]
    BadVersion(u32),

    #[error("home directory not available to expand '~'")]
    NoHome,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load flag defaults from a config file.
    ///
    /// An explicitly given path must exist; the implicit default location
    /// is optional and yields built-in defaults when absent.
    pub fn load(config_path: Option<&Path>) -> Result<ResolvedDefaults, ConfigError> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => default_config_path(),
        };

        if !path.exists() {
            if config_path.is_some() {
                return Err(ConfigError::NotFound(path.display().to_string()));
            }
            return Ok(ResolvedDefaults::default());
        }

        let s = fs::read_to_string(&path)
            .map_err(|e| ConfigError::ReadError(path.display().to_string(), e))?;

        let cf: ConfigFile = toml::from_str(&s)
            .map_err(|e| ConfigError::ParseError(path.display().to_string(), e))?;

        if cf.version != 1 {
            return Err(ConfigError::BadVersion(cf.version));
        }

        Self::resolve_defaults(&cf.defaults)
    }

    fn resolve_defaults(defaults: &FlagDefaults) -> Result<ResolvedDefaults, ConfigError> {
        let contextfiles = defaults
            .contextfiles
            .iter()
            .map(|p| expand_path(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ResolvedDefaults {
            dynamic_contextfiles: defaults.dynamic_contextfiles,
            defaults_type_check: defaults.defaults_type_check,
            ignore_undefined: defaults.ignore_undefined,
            mode: defaults.mode.clone(),
            contextfiles,
        })
    }
}

pub fn default_config_path() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return Path::new(&xdg).join("stencil").join("config.toml");
    }
    let home = home_dir().unwrap_or_else(|| PathBuf::from("~"));
    home.join(".config").join("stencil").join("config.toml")
}

fn expand_path(input: &str) -> Result<PathBuf, ConfigError> {
    let expanded = full(input).map_err(|_| ConfigError::NoHome)?;
    Ok(PathBuf::from(expanded.to_string()))
}
