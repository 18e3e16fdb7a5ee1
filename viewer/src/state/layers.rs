//! Layer rows for the layer panel and background size handling.

#[cfg(test)]
#[path = "layers_test.rs"]
mod layers_test;

use mapview::settings::{BackgroundRef, Layers};

/// Fallback side length, in meters, for an unparsable size field.
pub const DEFAULT_SIDE_M: f64 = 1000.0;

/// One toggleable layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Background,
    Grid,
    Markers,
    EventSpawns,
    Territories,
    SpawnPoints,
    EffectAreas,
}

impl Layer {
    pub const ALL: [Layer; 7] = [
        Self::Background,
        Self::Grid,
        Self::Markers,
        Self::EventSpawns,
        Self::Territories,
        Self::SpawnPoints,
        Self::EffectAreas,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Background => "Background image",
            Self::Grid => "Grid",
            Self::Markers => "Markers",
            Self::EventSpawns => "Event spawns",
            Self::Territories => "Territories",
            Self::SpawnPoints => "Player spawn points",
            Self::EffectAreas => "Effect areas",
        }
    }

    #[must_use]
    pub fn is_shown(self, layers: &Layers) -> bool {
        match self {
            Self::Background => layers.show_background,
            Self::Grid => layers.show_grid,
            Self::Markers => layers.show_markers,
            Self::EventSpawns => layers.show_event_spawns,
            Self::Territories => layers.show_territories,
            Self::SpawnPoints => layers.show_spawn_points,
            Self::EffectAreas => layers.show_effect_areas,
        }
    }

    /// Copy of `layers` with this layer set to `shown`.
    #[must_use]
    pub fn with(self, layers: Layers, shown: bool) -> Layers {
        let mut next = layers;
        let flag = match self {
            Self::Background => &mut next.show_background,
            Self::Grid => &mut next.show_grid,
            Self::Markers => &mut next.show_markers,
            Self::EventSpawns => &mut next.show_event_spawns,
            Self::Territories => &mut next.show_territories,
            Self::SpawnPoints => &mut next.show_spawn_points,
            Self::EffectAreas => &mut next.show_effect_areas,
        };
        *flag = shown;
        next
    }
}

/// Copy of `layers` with the opacity taken from a 0..=100 slider value.
#[must_use]
pub fn with_opacity_percent(layers: Layers, raw: &str) -> Layers {
    let mut next = layers;
    if let Ok(percent) = raw.trim().parse::<f64>() {
        next.set_background_opacity(percent / 100.0);
    }
    next
}

/// Parse a size field in meters. Blank, unparsable or non-positive input
/// falls back to [`DEFAULT_SIDE_M`].
#[must_use]
pub fn parse_side(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(side) if side.is_finite() && side > 0.0 => side,
        _ => DEFAULT_SIDE_M,
    }
}

/// Give a freshly uploaded raster one meter per pixel where no size was set.
#[must_use]
pub fn fill_size(reference: BackgroundRef, width_px: u32, height_px: u32) -> BackgroundRef {
    let side = |m: f64, px: u32| if m.is_finite() && m > 0.0 { m } else { f64::from(px.max(1)) };
    BackgroundRef {
        width_m: side(reference.width_m, width_px),
        height_m: side(reference.height_m, height_px),
        ..reference
    }
}
