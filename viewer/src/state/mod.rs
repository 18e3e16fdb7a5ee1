//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! Components never touch the engine directly. They read `ViewerState`
//! snapshots published by the canvas host and push `Command`s onto the
//! shared queue, which the host drains against the engine.

pub mod commands;
pub mod filter_form;
pub mod layers;
pub mod viewer;
