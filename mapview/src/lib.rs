//! Rendering and interaction engine for the mission map viewer.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! map canvas: translating raw DOM input into camera, selection and edit
//! changes, hit-testing entities across categories, computing filter
//! visibility, and drawing each frame over an optional raster background.
//! The host (the `viewer` crate) only wires DOM events to the engine, runs
//! network calls, and carries out the resulting [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Entity model and the in-memory [`doc::EntityStore`] |
//! | [`camera`] | Pan/zoom camera and world/screen conversions |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Cross-category hit-testing |
//! | [`selection`] | Per-category selection sets |
//! | [`filter`] | Filter specs and visibility recomputation |
//! | [`edit`] | Spawn-point drag, dirty tracking, save/discard |
//! | [`settings`] | Persisted layer toggles and background reference |
//! | [`style`] | Entity state to color/size lookup |
//! | [`grid`] | World grid line generation |
//! | [`tooltip`] | Hover tooltip text and placement |
//! | [`background`] | WebGL and 2D background backends |
//! | [`render`] | Per-frame draw passes |
//! | [`error`] | Shared error type |
//! | [`consts`] | Shared numeric constants |

pub mod background;
pub mod camera;
pub mod consts;
pub mod doc;
pub mod edit;
pub mod engine;
pub mod error;
pub mod filter;
pub mod grid;
pub mod hit;
pub mod input;
pub mod render;
pub mod selection;
pub mod settings;
pub mod style;
pub mod tooltip;
