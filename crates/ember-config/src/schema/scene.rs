//! Scene composition settings: tessellation level, part colors, flame look.

use ember_common::Color;
use serde::{Deserialize, Serialize};

/// Face part colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacePalette {
    pub eye: Color,
    pub lash: Color,
    pub eyeball: Color,
    pub nose: Color,
    pub mouth: Color,
}

impl Default for FacePalette {
    fn default() -> Self {
        Self {
            eye: Color::WHITE,
            lash: Color::from_rgb(204, 51, 51),
            eyeball: Color::from_rgb(204, 51, 51),
            nose: Color::from_rgb(120, 40, 20),
            mouth: Color::from_rgb(60, 10, 10),
        }
    }
}

/// Procedural flame look: iridescence palette and noise parameters.
///
/// The palette follows the cosine-gradient form
/// `a + b * cos(2π(c * t + d))`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlameConfig {
    pub irid_a: [f64; 3],
    pub irid_b: [f64; 3],
    pub irid_c: [f64; 3],
    pub irid_d: [f64; 3],
    pub perlin_freq: f64,
    pub fbm_amp: f64,
    pub fbm_freq: f64,
}

impl Default for FlameConfig {
    fn default() -> Self {
        Self {
            irid_a: [0.5, 0.5, 0.5],
            irid_b: [0.5, 0.5, 0.5],
            irid_c: [1.0, 1.0, 1.0],
            irid_d: [0.0, 0.33, 0.67],
            perlin_freq: 2.0,
            fbm_amp: 0.5,
            fbm_freq: 3.0,
        }
    }
}

/// Scene settings, all editable while the app runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Icosphere subdivision level (valid range: 0-8).
    pub subdivisions: u32,
    /// Base ember color.
    pub geom_color: Color,
    /// Draw the translucent outer flame shell.
    pub outer_flame: bool,
    /// Radius multiplier of the outer flame shell (valid range: 0.5-2.0).
    pub outer_flame_scale: f64,
    pub nose: bool,
    pub mouth: bool,
    pub palette: FacePalette,
    pub flame: FlameConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            subdivisions: 5,
            geom_color: Color::from_rgb(183, 140, 17),
            outer_flame: false,
            outer_flame_scale: 1.06,
            nose: true,
            mouth: true,
            palette: FacePalette::default(),
            flame: FlameConfig::default(),
        }
    }
}
