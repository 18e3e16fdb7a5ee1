//! DOM event to engine input mapping.

#[cfg(test)]
#[path = "canvas_input_test.rs"]
mod canvas_input_test;

#[cfg(feature = "hydrate")]
use mapview::camera::Point;
use mapview::error::ViewerError;
use mapview::input::{Modifiers, WheelDelta};

/// Pixels per line for `WheelEvent.DOM_DELTA_LINE`.
const LINE_PX: f64 = 16.0;
/// Pixels per page for `WheelEvent.DOM_DELTA_PAGE`.
const PAGE_PX: f64 = 800.0;

#[must_use]
pub fn map_modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers { shift, ctrl, alt, meta }
}

/// Normalize a wheel delta to pixels whatever `deltaMode` the browser used.
#[must_use]
pub fn wheel_delta(dx: f64, dy: f64, delta_mode: u32) -> WheelDelta {
    let unit = match delta_mode {
        1 => LINE_PX,
        2 => PAGE_PX,
        _ => 1.0,
    };
    WheelDelta { dx: dx * unit, dy: dy * unit }
}

#[cfg(feature = "hydrate")]
pub fn mouse_point(ev: &web_sys::MouseEvent) -> Point {
    Point::new(f64::from(ev.offset_x()), f64::from(ev.offset_y()))
}

#[cfg(feature = "hydrate")]
pub fn mouse_modifiers(ev: &web_sys::MouseEvent) -> Modifiers {
    map_modifiers(ev.shift_key(), ev.ctrl_key(), ev.alt_key(), ev.meta_key())
}

#[cfg(feature = "hydrate")]
pub fn wheel_input(ev: &web_sys::WheelEvent) -> (Point, WheelDelta) {
    (mouse_point(ev), wheel_delta(ev.delta_x(), ev.delta_y(), ev.delta_mode()))
}

/// Text of the save-or-discard prompt shown when leaving edit mode.
#[must_use]
pub fn decision_prompt(dirty: usize) -> String {
    let (noun, verb) = if dirty == 1 { ("spawn point", "is") } else { ("spawn points", "are") };
    format!("You have {dirty} moved {noun} that {verb} not saved.\n\nOK saves, Cancel discards.")
}

/// Alert text for a failed destructive action, e.g. `Deleting the background image failed: ...`.
#[must_use]
pub fn failure_alert(what: &str, err: &ViewerError) -> String {
    format!("{what} failed: {err}")
}
