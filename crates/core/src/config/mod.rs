//! Optional TOML configuration supplying command-line flag defaults.

pub mod loader;
pub mod types;

pub use loader::{default_config_path, ConfigError, ConfigLoader};
pub use types::{ConfigFile, FlagDefaults, ResolvedDefaults};
