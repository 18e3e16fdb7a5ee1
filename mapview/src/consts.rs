//! Shared numeric constants for the map view crate.

// ── Camera ──────────────────────────────────────────────────────

/// Smallest allowed view scale, in screen pixels per world meter.
pub const MIN_SCALE: f64 = 0.1;

/// Largest allowed view scale, in screen pixels per world meter.
pub const MAX_SCALE: f64 = 10.0;

/// Screen padding kept around the marker bounding box by fit-to-view.
pub const FIT_PADDING_PX: f64 = 50.0;

/// Zoom factor applied per wheel notch towards the user (zoom in).
pub const WHEEL_ZOOM_IN: f64 = 1.1;

/// Zoom factor applied per wheel notch away from the user (zoom out).
pub const WHEEL_ZOOM_OUT: f64 = 0.9;

// ── Interaction ─────────────────────────────────────────────────

/// Cursor-to-entity proximity radius for hover, click and drag, in screen pixels.
pub const HIT_THRESHOLD_PX: f64 = 5.0;

/// Marquee rectangles must exceed this size on both axes to count as a gesture.
pub const MARQUEE_MIN_PX: f64 = 5.0;

/// Positions are snapped to this many decimal places when a drag ends.
pub const SNAP_DECIMALS: i32 = 2;

// ── Grid ────────────────────────────────────────────────────────

/// World spacing between grid lines, in meters.
pub const GRID_SPACING_M: f64 = 100.0;

/// Every grid line on a multiple of this spacing is emphasized.
pub const GRID_MAJOR_SPACING_M: f64 = 1000.0;

// ── Tooltip ─────────────────────────────────────────────────────

/// Inner padding of the tooltip box, in screen pixels.
pub const TOOLTIP_PADDING_PX: f64 = 8.0;

/// Vertical advance per tooltip line, in screen pixels.
pub const TOOLTIP_LINE_HEIGHT_PX: f64 = 18.0;

/// Tooltip font size, in screen pixels.
pub const TOOLTIP_FONT_PX: f64 = 12.0;

/// Distance between the cursor and the tooltip box on each axis.
pub const TOOLTIP_CURSOR_OFFSET_PX: f64 = 15.0;

// ── Background ──────────────────────────────────────────────────

/// Fill color behind the background raster.
pub const BACKGROUND_CLEAR_COLOR: &str = "#2E3440";

/// Same clear color as linear RGBA for the WebGL backend.
pub const BACKGROUND_CLEAR_RGBA: [f32; 4] = [0.18, 0.20, 0.25, 1.0];
