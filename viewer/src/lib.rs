//! # viewer
//!
//! Leptos + WASM host for the mission map viewer.
//!
//! The `mapview` engine owns the canvas; this crate supplies everything
//! around it: the toolbar and side panels, the shared [`state`] snapshot,
//! HTTP calls to the mission backend in [`net`], and `localStorage`
//! persistence in [`util`]. The [`components::canvas_host`] bridge forwards
//! DOM input to the engine and carries out the actions it returns.

pub mod app;
pub mod components;
pub mod net;
pub mod state;
pub mod util;

/// WASM entry point: install logging and mount the app on `<body>`.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("viewer: logger already set: {err}").into());
    }
    leptos::mount::mount_to_body(app::App);
}
