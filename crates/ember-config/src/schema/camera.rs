//! Camera placement and projection settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: [f64; 3],
    pub target: [f64; 3],
    /// Vertical field of view (valid range: 10-120).
    pub fov_y_degrees: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [0.0, 0.0, 5.0],
            target: [0.0, 0.0, 0.0],
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}
