//! World-space grid line generation.
//!
//! Lines are sampled at [`GRID_SPACING_M`] across the visible world rect,
//! floored and ceiled to whole steps, so the cost depends on how many lines
//! are visible rather than on the canvas size.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use crate::camera::{Camera, Point, Size, WorldPoint};
use crate::consts::{GRID_MAJOR_SPACING_M, GRID_SPACING_M};

/// Stroke for lines on a major spacing.
pub const GRID_MAJOR_STROKE: &str = "rgba(204, 204, 204, 0.6)";

/// Stroke for ordinary lines.
pub const GRID_MINOR_STROKE: &str = "rgba(204, 204, 204, 0.3)";

/// One grid line, already in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub from: Point,
    pub to: Point,
    /// World coordinate the line sits on (x for vertical lines, z for horizontal ones).
    pub world: f64,
    pub major: bool,
}

impl GridLine {
    #[must_use]
    pub fn stroke(&self) -> &'static str {
        if self.major { GRID_MAJOR_STROKE } else { GRID_MINOR_STROKE }
    }
}

/// Grid lines covering the viewport: vertical lines first, then horizontal.
/// Segments are clipped to the viewport.
#[must_use]
pub fn grid_lines(camera: &Camera, viewport: Size) -> Vec<GridLine> {
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return Vec::new();
    }
    let visible = camera.visible_world_rect(viewport);
    let mut lines = Vec::new();

    for (i, x) in steps(visible.min_x, visible.max_x) {
        let top = camera.world_to_screen(WorldPoint::new(x, visible.max_z));
        let bottom = camera.world_to_screen(WorldPoint::new(x, visible.min_z));
        lines.push(GridLine {
            from: Point::new(top.x, top.y.max(0.0)),
            to: Point::new(bottom.x, bottom.y.min(viewport.height)),
            world: x,
            major: is_major(i),
        });
    }
    for (i, z) in steps(visible.min_z, visible.max_z) {
        let left = camera.world_to_screen(WorldPoint::new(visible.min_x, z));
        let right = camera.world_to_screen(WorldPoint::new(visible.max_x, z));
        lines.push(GridLine {
            from: Point::new(left.x.max(0.0), left.y),
            to: Point::new(right.x.min(viewport.width), right.y),
            world: z,
            major: is_major(i),
        });
    }
    lines
}

/// Step indices and world coordinates from `floor(min)` to `ceil(max)`.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn steps(min: f64, max: f64) -> impl Iterator<Item = (i64, f64)> {
    let (first, last) = if min.is_finite() && max.is_finite() {
        ((min / GRID_SPACING_M).floor() as i64, (max / GRID_SPACING_M).ceil() as i64)
    } else {
        (0, -1)
    };
    (first..=last).map(|i| (i, i as f64 * GRID_SPACING_M))
}

#[allow(clippy::cast_possible_truncation)]
fn is_major(step: i64) -> bool {
    let per_major = (GRID_MAJOR_SPACING_M / GRID_SPACING_M).round() as i64;
    step.rem_euclid(per_major) == 0
}
