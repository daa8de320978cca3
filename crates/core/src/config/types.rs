use std::path::PathBuf;

use serde::Deserialize;

/// On-disk configuration file (`config.toml`).
#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    #[serde(default)]
    pub defaults: FlagDefaults,
}

/// Default values for command-line flags, as written in the config file.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct FlagDefaults {
    #[serde(default)]
    pub dynamic_contextfiles: bool,

    #[serde(default)]
    pub defaults_type_check: bool,

    #[serde(default)]
    pub ignore_undefined: bool,

    /// Octal file mode applied to rendered files.
    #[serde(default)]
    pub mode: Option<String>,

    /// Context file paths prepended to those given with `-c`.
    /// `~` and environment variables are expanded.
    #[serde(default)]
    pub contextfiles: Vec<String>,
}

/// Flag defaults with paths expanded, ready for the orchestration layer.
#[derive(Debug, Default, Clone)]
pub struct ResolvedDefaults {
    pub dynamic_contextfiles: bool,
    pub defaults_type_check: bool,
    pub ignore_undefined: bool,
    pub mode: Option<String>,
    pub contextfiles: Vec<PathBuf>,
}
