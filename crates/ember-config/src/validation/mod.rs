//! Full configuration validation.
//!
//! Validates numeric ranges and camera geometry. Each domain has its own
//! submodule; this orchestrator calls them all and collects errors into a
//! single `ConfigError`.

mod camera;
mod helpers;
pub(crate) mod scene;
mod system;


use crate::schema::EmberConfig;
use ember_common::ConfigError;

pub use scene::MAX_SUBDIVISIONS;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &EmberConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    scene::validate_scene(&mut errors, config);
    camera::validate_camera(&mut errors, config);
    system::validate_window(&mut errors, config);
    system::validate_logging(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
