//! Network layer: REST wire types and `gloo-net` helpers.

pub mod api;
pub mod types;
