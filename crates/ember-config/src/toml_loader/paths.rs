//! Where ember keeps its config file, and writing the commented template.

use ember_common::ConfigError;
use std::path::{Path, PathBuf};
use tracing::info;

use super::template::default_config_toml;

const APP_DIR: &str = "ember";
const CONFIG_FILE: &str = "config.toml";

/// `<platform config dir>/ember/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
        .ok_or_else(|| ConfigError::ParseError("no platform config directory".into()))
}

/// Write the template to `path`, creating missing parent directories.
/// An existing file is overwritten.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let io_failure = |what: &str, target: &Path, e: std::io::Error| {
        ConfigError::ParseError(format!("could not {what} {}: {e}", target.display()))
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_failure("create", parent, e))?;
    }
    std::fs::write(path, default_config_toml()).map_err(|e| io_failure("write", path, e))?;

    info!(path = %path.display(), "wrote default ember config");
    Ok(())
}
