//! User-facing view settings that persist across reloads.

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

use serde::{Deserialize, Serialize};

/// Layer toggles and background opacity.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layers {
    pub show_grid: bool,
    pub show_markers: bool,
    pub show_event_spawns: bool,
    pub show_territories: bool,
    pub show_spawn_points: bool,
    pub show_effect_areas: bool,
    pub show_background: bool,
    /// Background raster opacity in `[0, 1]`.
    pub background_opacity: f64,
}

impl Default for Layers {
    fn default() -> Self {
        Self {
            show_grid: true,
            show_markers: true,
            show_event_spawns: true,
            show_territories: true,
            show_spawn_points: true,
            show_effect_areas: true,
            show_background: true,
            background_opacity: 1.0,
        }
    }
}

impl Layers {
    /// Set the background opacity, clamped to `[0, 1]`. Non-finite input is ignored.
    pub fn set_background_opacity(&mut self, opacity: f64) {
        if opacity.is_finite() {
            self.background_opacity = opacity.clamp(0.0, 1.0);
        }
    }
}

/// Reference to an uploaded background raster and its real-world size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundRef {
    pub image_id: String,
    /// World width covered by the image, in meters.
    pub width_m: f64,
    /// World height covered by the image, in meters.
    pub height_m: f64,
}

impl BackgroundRef {
    /// Whether the reference describes a drawable area.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.image_id.is_empty()
            && self.width_m.is_finite()
            && self.height_m.is_finite()
            && self.width_m > 0.0
            && self.height_m > 0.0
    }
}
