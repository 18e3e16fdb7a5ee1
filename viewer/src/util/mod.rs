//! Utility helpers shared across viewer UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns from component
//! logic to improve reuse and testability.

pub mod canvas_input;
pub mod persistence;
