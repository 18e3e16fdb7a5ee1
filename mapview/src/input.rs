//! Input model: modifier keys, mouse buttons, wheel deltas, and the gesture
//! state machine.
//!
//! `InputState` is the gesture tracked between pointer-down and pointer-up.
//! Each active variant carries the context needed to apply incremental
//! updates on pointer-move and to commit on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::consts::{MARQUEE_MIN_PX, WHEEL_ZOOM_IN, WHEEL_ZOOM_OUT};

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held. Shift + primary pans.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held. Turns selection gestures into deselection.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Whether selection gestures should remove instead of add.
    #[must_use]
    pub fn deselect(self) -> bool {
        self.alt
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button.
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

impl WheelDelta {
    /// Zoom factor for this notch: scrolling down zooms out.
    #[must_use]
    pub fn zoom_factor(self) -> f64 {
        if self.dy > 0.0 { WHEEL_ZOOM_OUT } else { WHEEL_ZOOM_IN }
    }
}

/// Screen-space marquee rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marquee {
    pub start: Point,
    pub current: Point,
}

impl Marquee {
    /// Top-left corner and size, normalized.
    #[must_use]
    pub fn rect(&self) -> (f64, f64, f64, f64) {
        let x = self.start.x.min(self.current.x);
        let y = self.start.y.min(self.current.y);
        (x, y, (self.current.x - self.start.x).abs(), (self.current.y - self.start.y).abs())
    }

    /// A marquee must exceed the minimum on both axes; smaller ones are
    /// treated as accidental clicks.
    #[must_use]
    pub fn is_significant(&self) -> bool {
        let (_, _, w, h) = self.rect();
        w > MARQUEE_MIN_PX && h > MARQUEE_MIN_PX
    }
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; pointer moves update hover.
    #[default]
    Idle,
    /// The view follows the pointer.
    Panning {
        /// Screen position of the previous pointer event.
        last_screen: Point,
    },
    /// A selection rectangle is being drawn.
    Marqueeing(Marquee),
    /// One or more spawn points follow the pointer.
    Dragging {
        /// The spawn point that was grabbed.
        index: usize,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Active marquee, if one is being drawn.
    #[must_use]
    pub fn marquee(&self) -> Option<Marquee> {
        match self {
            Self::Marqueeing(m) => Some(*m),
            _ => None,
        }
    }
}
