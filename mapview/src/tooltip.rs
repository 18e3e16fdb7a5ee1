//! Hover tooltip: line composition and placement.
//!
//! Text measurement needs a canvas, so [`layout`] takes the measured width of
//! the widest line and stays pure.

#[cfg(test)]
#[path = "tooltip_test.rs"]
mod tooltip_test;

use crate::camera::{Point, Size};
use crate::consts::{TOOLTIP_CURSOR_OFFSET_PX, TOOLTIP_LINE_HEIGHT_PX, TOOLTIP_PADDING_PX};
use crate::doc::{Category, EntityRef, EntityStore, Position};

const UNNAMED: &str = "(Unnamed)";
const SPAWN_POINT_TITLE: &str = "Player Spawn Point";

/// Tooltip box in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl TooltipBox {
    /// Baseline of line `i`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn baseline(&self, i: usize) -> f64 {
        self.y + TOOLTIP_PADDING_PX + TOOLTIP_LINE_HEIGHT_PX * (i as f64 + 1.0) - 4.0
    }
}

/// Ordered tooltip text for an entity. Empty for an unknown handle.
#[must_use]
pub fn tooltip_lines(store: &EntityStore, entity: EntityRef) -> Vec<String> {
    let Some(position) = store.position(entity) else {
        return Vec::new();
    };
    let i = entity.index;
    let mut lines = Vec::new();

    let title = match entity.category {
        Category::SpawnPoint => SPAWN_POINT_TITLE,
        Category::Marker => store.markers.get(i).map_or("", |m| m.name.as_str()),
        Category::EventSpawn => store.event_spawns.get(i).map_or("", |e| e.name.as_str()),
        Category::Zone => store.zone(i).map_or("", |(territory, _)| territory.name.as_str()),
    };
    lines.push(if title.is_empty() { UNNAMED.to_owned() } else { title.to_owned() });
    lines.push(String::new());
    push_coordinates(&mut lines, position);

    match entity.category {
        Category::Marker => {
            if let Some(marker) = store.markers.get(i) {
                push_block(&mut lines, "Usage:", &marker.usage_names());
                push_block(&mut lines, "Containers:", &marker.container_names());
            }
        }
        Category::EventSpawn => {
            if let Some(spawn) = store.event_spawns.get(i) {
                push_block(&mut lines, "Category:", &spawn.categories);
            }
        }
        Category::Zone => {
            if let Some((territory, zone)) = store.zone(i) {
                if let Some(radius) = zone.radius {
                    lines.push(String::new());
                    lines.push(format!("Radius: {radius:.2} m"));
                }
                lines.push(String::new());
                lines.push(format!("Territory: {}", territory.name));
                lines.push(format!("Territory Type: {}", territory.territory_type));
            }
        }
        Category::SpawnPoint => {
            if let Some(point) = store.spawn_points.get(i) {
                lines.push(String::new());
                lines.push(format!("Rectangle Width: {:.2} m", point.width));
                lines.push(format!("Rectangle Height: {:.2} m", point.height));
            }
        }
    }
    lines
}

fn push_coordinates(lines: &mut Vec<String>, p: Position) {
    if p.x.is_finite() && p.y.is_finite() && p.z.is_finite() {
        lines.push(format!("X: {:.2} m", p.x));
        lines.push(format!("Y: {:.2} m", p.y));
        lines.push(format!("Z: {:.2} m", p.z));
    }
}

fn push_block(lines: &mut Vec<String>, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(heading.to_owned());
    lines.extend(items.iter().map(|item| format!("  \u{2022} {item}")));
}

/// Place a box for `line_count` lines whose widest line measures `text_width`.
///
/// Default placement is right of and above the cursor. The box flips left on
/// right-edge overflow and below on top-edge overflow, then is pulled up to
/// stay clear of the bottom edge.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn layout(cursor: Point, text_width: f64, line_count: usize, viewport: Size) -> TooltipBox {
    let width = text_width + TOOLTIP_PADDING_PX * 2.0;
    let height = line_count as f64 * TOOLTIP_LINE_HEIGHT_PX + TOOLTIP_PADDING_PX * 2.0;

    let mut x = cursor.x + TOOLTIP_CURSOR_OFFSET_PX;
    let mut y = cursor.y - height - TOOLTIP_CURSOR_OFFSET_PX;
    if x + width > viewport.width {
        x = cursor.x - width - TOOLTIP_CURSOR_OFFSET_PX;
    }
    if y < 0.0 {
        y = cursor.y + TOOLTIP_CURSOR_OFFSET_PX;
    }
    if y + height > viewport.height {
        y = viewport.height - height - TOOLTIP_PADDING_PX;
    }
    TooltipBox { x, y, width, height }
}
