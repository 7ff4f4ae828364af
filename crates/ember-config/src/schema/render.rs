//! Renderer settings.

use ember_common::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub clear_color: Color,
    /// FIFO presentation when true, immediate/mailbox otherwise.
    pub vsync: bool,
    /// Draw mesh edges instead of filled triangles.
    pub wireframe: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: Color::from_rgb(51, 51, 51),
            vsync: true,
            wireframe: false,
        }
    }
}
