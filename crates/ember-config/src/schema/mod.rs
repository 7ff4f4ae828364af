//! Configuration schema types for Ember.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with the defaults of the stock ember face.

mod camera;
mod render;
mod scene;
mod system;
mod window;

pub use camera::*;
pub use render::*;
pub use scene::*;
pub use system::*;
pub use window::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Ember.
///
/// Only override what you want to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct EmberConfig {
    pub scene: SceneConfig,
    pub camera: CameraConfig,
    pub window: WindowConfig,
    pub render: RenderConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================
