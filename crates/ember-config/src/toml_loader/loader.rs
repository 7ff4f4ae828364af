//! Reading an ember config file into `EmberConfig`.

use crate::schema::EmberConfig;
use crate::validation;
use ember_common::ConfigError;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

use super::paths::{create_default_config, default_config_path};

/// Parse the TOML file at `path`. Absent keys take their defaults.
///
/// Out-of-range values are only warned about here; callers that must not
/// run with them validate separately.
pub fn load_from_path(path: &Path) -> Result<EmberConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ConfigError::FileNotFound(path.to_path_buf()),
        _ => ConfigError::ParseError(format!("could not read {}: {e}", path.display())),
    })?;

    let config: EmberConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;

    if let Err(e) = validation::validate(&config) {
        warn!(path = %path.display(), "config has out-of-range values: {e}");
    }

    info!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Load the config from its default location, writing the template there
/// first if nothing exists yet.
pub fn load_default() -> Result<EmberConfig, ConfigError> {
    let path = default_config_path()?;
    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            create_default_config(&path)?;
            Ok(EmberConfig::default())
        }
        loaded => loaded,
    }
}
