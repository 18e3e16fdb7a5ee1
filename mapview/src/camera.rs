//! View transform between world meters and screen pixels.
//!
//! World space is the mission's ground plane: `x` grows east and `z` grows
//! north. Screen space is CSS pixels with `y` growing down, so the transform
//! flips the `z` axis around the top of the loaded world bounds. That keeps
//! north rendering upward without any negative scale factors.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{FIT_PADDING_PX, MAX_SCALE, MIN_SCALE};

/// A point in screen space (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Whether both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A point on the world ground plane, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: f64,
    pub z: f64,
}

impl WorldPoint {
    #[must_use]
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }
}

/// Viewport dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle on the world plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldRect {
    pub min_x: f64,
    pub max_x: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl WorldRect {
    /// Build a rect from two arbitrary corners.
    #[must_use]
    pub fn from_corners(a: WorldPoint, b: WorldPoint) -> Self {
        Self {
            min_x: a.x.min(b.x),
            max_x: a.x.max(b.x),
            min_z: a.z.min(b.z),
            max_z: a.z.max(b.z),
        }
    }

    /// Smallest rect enclosing every point, or `None` when there are none.
    #[must_use]
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = WorldPoint>,
    {
        let mut iter = points.into_iter().filter(|p| p.x.is_finite() && p.z.is_finite());
        let first = iter.next()?;
        let seed = Self { min_x: first.x, max_x: first.x, min_z: first.z, max_z: first.z };
        Some(iter.fold(seed, |r, p| Self {
            min_x: r.min_x.min(p.x),
            max_x: r.max_x.max(p.x),
            min_z: r.min_z.min(p.z),
            max_z: r.max_z.max(p.z),
        }))
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_z - self.min_z
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, p: WorldPoint) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.z >= self.min_z && p.z <= self.max_z
    }

    /// Overlap of two rects, or `None` when they do not overlap with positive area.
    #[must_use]
    pub fn intersect(&self, other: &WorldRect) -> Option<WorldRect> {
        let r = WorldRect {
            min_x: self.min_x.max(other.min_x),
            max_x: self.max_x.min(other.max_x),
            min_z: self.min_z.max(other.min_z),
            max_z: self.max_z.min(other.max_z),
        };
        if r.min_x >= r.max_x || r.min_z >= r.max_z {
            return None;
        }
        Some(r)
    }
}

/// Pan/zoom state of the map view.
///
/// `offset_x` / `offset_y` are in CSS pixels, `scale` is pixels per meter and
/// `bounds` is the world extent used as the transform origin (`min_x` on the
/// left, `max_z` on top).
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
    pub bounds: WorldRect,
}

impl Default for Camera {
    fn default() -> Self {
        Self { offset_x: 0.0, offset_y: 0.0, scale: 1.0, bounds: WorldRect::default() }
    }
}

impl Camera {
    /// Convert a world point to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: WorldPoint) -> Point {
        Point {
            x: (world.x - self.bounds.min_x) * self.scale + self.offset_x,
            y: (self.bounds.max_z - world.z) * self.scale + self.offset_y,
        }
    }

    /// Convert a screen point back to world coordinates. Exact inverse of
    /// [`Camera::world_to_screen`].
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> WorldPoint {
        WorldPoint {
            x: (screen.x - self.offset_x) / self.scale + self.bounds.min_x,
            z: self.bounds.max_z - (screen.y - self.offset_y) / self.scale,
        }
    }

    /// Convert a world length (meters) into screen pixels.
    #[must_use]
    pub fn world_len_to_screen(&self, meters: f64) -> f64 {
        meters * self.scale
    }

    /// Shift the view by a screen-space delta.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Multiply the scale by `factor` while keeping the world point under
    /// `anchor` fixed on screen. The resulting scale is clamped to
    /// [`MIN_SCALE`, `MAX_SCALE`].
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let pinned = self.screen_to_world(anchor);
        self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        let moved = self.world_to_screen(pinned);
        self.offset_x += anchor.x - moved.x;
        self.offset_y += anchor.y - moved.y;
    }

    /// Frame `extent` inside `viewport` with [`FIT_PADDING_PX`] of margin.
    ///
    /// The scale never exceeds 1.0, so small missions are not blown up past
    /// one pixel per meter. With no extent the view resets to identity.
    pub fn fit_to_view(&mut self, extent: Option<WorldRect>, viewport: Size) {
        let Some(extent) = extent else {
            self.scale = 1.0;
            self.offset_x = 0.0;
            self.offset_y = 0.0;
            return;
        };
        self.bounds = extent;

        let avail_w = viewport.width - FIT_PADDING_PX * 2.0;
        let avail_h = viewport.height - FIT_PADDING_PX * 2.0;
        let scale_x = axis_scale(avail_w, extent.width());
        let scale_z = axis_scale(avail_h, extent.height());
        let mut scale = scale_x.min(scale_z).min(1.0);
        if !scale.is_finite() || scale <= 0.0 {
            scale = MIN_SCALE;
        }
        self.scale = scale;

        let center_x = (extent.min_x + extent.max_x) * 0.5;
        let center_z = (extent.min_z + extent.max_z) * 0.5;
        self.offset_x = viewport.width * 0.5 - (center_x - extent.min_x) * scale;
        self.offset_y = viewport.height * 0.5 - (extent.max_z - center_z) * scale;
    }

    /// World rectangle currently covered by a viewport of the given size.
    #[must_use]
    pub fn visible_world_rect(&self, viewport: Size) -> WorldRect {
        let top_left = self.screen_to_world(Point::new(0.0, 0.0));
        let bottom_right = self.screen_to_world(Point::new(viewport.width, viewport.height));
        WorldRect::from_corners(top_left, bottom_right)
    }
}

/// Scale that fits `extent` meters into `avail` pixels; unconstrained for a
/// degenerate extent.
fn axis_scale(avail: f64, extent: f64) -> f64 {
    if extent <= 0.0 {
        return f64::INFINITY;
    }
    avail / extent
}
