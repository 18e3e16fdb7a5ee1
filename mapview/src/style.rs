//! Visual encoding: entity state to colors, line widths and radii.
//!
//! Every pass asks for a style once per entity per frame; nothing here touches
//! the canvas.

#[cfg(test)]
#[path = "style_test.rs"]
mod style_test;

use crate::doc::Category;

/// Interaction state of one entity in the current frame.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityState {
    pub selected: bool,
    pub hovered: bool,
    pub dragging: bool,
    pub dirty: bool,
    /// The entity's category is in edit mode.
    pub editing: bool,
}

/// Stroke/fill for a center dot.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub fill: String,
    pub stroke: String,
    pub line_width: f64,
    /// Dot radius in screen pixels.
    pub radius: f64,
}

/// Stroke/fill for a translucent area (circle or rectangle).
#[derive(Debug, Clone, PartialEq)]
pub struct AreaStyle {
    pub fill: String,
    pub stroke: String,
    pub line_width: f64,
    pub alpha: f64,
}

const DOT_RADIUS: f64 = 4.0;
const DOT_RADIUS_EMPHASIZED: f64 = 6.0;

/// Dot style for an entity. `tint` is the owning territory color for zones.
#[must_use]
pub fn dot_style(category: Category, state: EntityState, tint: Option<&str>) -> Style {
    match category {
        Category::Marker => marker_style(state),
        Category::EventSpawn => event_spawn_style(state),
        Category::Zone => zone_style(state, tint),
        Category::SpawnPoint => spawn_point_style(state),
    }
}

fn marker_style(state: EntityState) -> Style {
    let (fill, stroke, line_width) = if state.selected {
        ("#ff0000", "#cc0000", 3.0)
    } else if state.hovered {
        ("#00ff00", "#00cc00", 3.0)
    } else {
        ("#0066ff", "#0044cc", 2.0)
    };
    Style {
        fill: fill.to_owned(),
        stroke: stroke.to_owned(),
        line_width,
        radius: if state.hovered { DOT_RADIUS_EMPHASIZED } else { DOT_RADIUS },
    }
}

fn event_spawn_style(state: EntityState) -> Style {
    let (fill, stroke, line_width) = if state.selected {
        ("#ff0000", "#cc0000", 3.0)
    } else if state.hovered {
        ("#ff00ff", "#cc00cc", 3.0)
    } else {
        ("#9900cc", "#7700aa", 2.0)
    };
    Style {
        fill: fill.to_owned(),
        stroke: stroke.to_owned(),
        line_width,
        radius: if state.hovered { DOT_RADIUS_EMPHASIZED } else { DOT_RADIUS },
    }
}

fn zone_style(state: EntityState, tint: Option<&str>) -> Style {
    let (fill, stroke, line_width) = match (state.selected, state.hovered, tint) {
        (true, _, _) => ("#ff0000".to_owned(), "#cc0000".to_owned(), 3.0),
        (false, true, Some(color)) => (lighten(color, 0.3), "#ffffff".to_owned(), 3.0),
        (false, true, None) => ("#00ff00".to_owned(), "#00cc00".to_owned(), 3.0),
        (false, false, Some(color)) => (color.to_owned(), darken(color, 0.2), 2.0),
        (false, false, None) => ("#0066ff".to_owned(), "#0044cc".to_owned(), 2.0),
    };
    Style { fill, stroke, line_width, radius: emphasized_radius(state) }
}

fn spawn_point_style(state: EntityState) -> Style {
    let (fill, stroke, line_width) = if state.editing && state.selected {
        if state.dragging { ("#ffff00", "#ffffff", 3.0) } else { ("#ff8800", "#ff6600", 3.0) }
    } else if state.editing && state.dirty {
        if state.dragging { ("#ffff00", "#ffffff", 3.0) } else { ("#ffaa00", "#ff8800", 3.0) }
    } else if state.hovered && !state.editing {
        ("#00ff00", "#00cc00", 3.0)
    } else {
        ("#0066ff", "#0044cc", 2.0)
    };
    Style { fill: fill.to_owned(), stroke: stroke.to_owned(), line_width, radius: emphasized_radius(state) }
}

fn emphasized_radius(state: EntityState) -> f64 {
    if state.hovered || state.dragging || state.selected { DOT_RADIUS_EMPHASIZED } else { DOT_RADIUS }
}

/// Rectangle around a player spawn point. Cyan unless it is an edited
/// (selected or dirty) point, which takes its dot colors.
#[must_use]
pub fn spawn_rect_style(state: EntityState) -> AreaStyle {
    let highlighted = state.editing && (state.dirty || state.selected);
    let (fill, stroke) = if highlighted {
        let dot = spawn_point_style(state);
        (dot.fill, dot.stroke)
    } else {
        ("#00ffff".to_owned(), if state.hovered { "#00ffff" } else { "#00aaaa" }.to_owned())
    };
    AreaStyle { fill, stroke, line_width: if state.hovered { 2.0 } else { 1.0 }, alpha: 0.15 }
}

/// Territory zone circle; tinted zones are fainter.
#[must_use]
pub fn zone_area_style(state: EntityState, tint: Option<&str>, scale: f64) -> AreaStyle {
    let dot = zone_style(state, tint);
    let base = if tint.is_some() { 0.2 } else { 0.3 };
    AreaStyle { fill: dot.fill, stroke: dot.stroke, line_width: dot.line_width, alpha: area_alpha(base, scale) }
}

/// Effect-area circle.
#[must_use]
pub fn effect_area_style(scale: f64) -> AreaStyle {
    AreaStyle { fill: "#ff8800".to_owned(), stroke: "#ff6600".to_owned(), line_width: 2.0, alpha: area_alpha(0.3, scale) }
}

/// Areas grow more opaque when zoomed out so they stay readable.
#[must_use]
pub fn area_alpha(base: f64, scale: f64) -> f64 {
    if scale < 1.0 { (base + (1.0 - scale) * 0.3).min(0.6) } else { base }
}

/// Darken a `#rrggbb` color by `amount` in `[0, 1]`. Unparseable input is returned as-is.
#[must_use]
pub fn darken(color: &str, amount: f64) -> String {
    map_rgb(color, |c| c * (1.0 - amount))
}

/// Lighten a `#rrggbb` color by `amount` in `[0, 1]`. Unparseable input is returned as-is.
#[must_use]
pub fn lighten(color: &str, amount: f64) -> String {
    map_rgb(color, |c| c + 255.0 * amount)
}

fn map_rgb(color: &str, f: impl Fn(f64) -> f64) -> String {
    let Some(rgb) = parse_hex(color) else {
        return color.to_owned();
    };
    let [r, g, b] = rgb.map(|c| channel(f(f64::from(c))));
    format!("#{r:02x}{g:02x}{b:02x}")
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn parse_hex(color: &str) -> Option<[u8; 3]> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let part = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
    match (part(0), part(2), part(4)) {
        (Ok(r), Ok(g), Ok(b)) => Some([r, g, b]),
        _ => None,
    }
}
