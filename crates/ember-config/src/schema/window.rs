//! Window configuration types.

use serde::{Deserialize, Serialize};

/// Initial window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Logical width (valid range: 64-16384).
    pub width: u32,
    /// Logical height (valid range: 64-16384).
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Ember".into(),
            width: 1280,
            height: 800,
        }
    }
}
