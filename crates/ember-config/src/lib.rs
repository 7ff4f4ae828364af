//! Ember configuration system.
//!
//! TOML-based configuration with validation and live reload. Every section
//! has defaults matching the stock ember face, so partial files work.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ember_config::{config_to_toml, load_config};
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config_to_toml(&config));
//! ```

pub mod reload;
pub mod schema;
pub mod toml_loader;
pub mod validation;
pub mod watcher;

pub use reload::ReloadManager;
pub use schema::{EmberConfig, CONFIG_SCHEMA_VERSION};
pub use validation::MAX_SUBDIVISIONS;
pub use watcher::ConfigWatcher;

use ember_common::ConfigError;
use std::path::Path;

/// Load config from the platform default path, creating it if missing,
/// and validate the result.
pub fn load_config() -> Result<EmberConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load and validate config from an explicit path, or from the default
/// location when `path` is `None`.
pub fn load_config_from(path: Option<&Path>) -> Result<EmberConfig, ConfigError> {
    match path {
        Some(path) => {
            let config = toml_loader::load_from_path(path)?;
            validation::validate(&config)?;
            Ok(config)
        }
        None => load_config(),
    }
}

/// Serialize a config to pretty TOML.
pub fn config_to_toml(config: &EmberConfig) -> String {
    toml::to_string_pretty(config)
        .unwrap_or_else(|e| format!("# failed to serialize config: {e}\n"))
}

/// The commented template written when no config file exists.
pub fn default_config_template() -> String {
    toml_loader::default_config_toml()
}
