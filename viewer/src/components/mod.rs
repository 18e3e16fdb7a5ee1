//! UI components for the map viewer.
//!
//! `CanvasHost` owns the engine; every other component talks to it through
//! the shared `CommandQueue` and reads the published `ViewerState`.

pub mod canvas_host;
pub mod filter_panel;
pub mod layer_panel;
pub mod status_bar;
pub mod toolbar;
