//! Requests from chrome components to the canvas host.
//!
//! Toolbar, filter panel and layer panel cannot reach the engine, so they
//! enqueue a [`Command`]. The host watches the queue's sequence number and
//! drains it in order.

#[cfg(test)]
#[path = "commands_test.rs"]
mod commands_test;

use mapview::filter::{FilterCategory, FilterSpec};
use mapview::settings::{BackgroundRef, Layers};

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    LoadMission(String),
    SetEditMode(bool),
    SaveEdits,
    DiscardEdits,
    FitToView,
    ClearSelection,
    CopySelectedSource,
    SetLayers(Layers),
    AddFilter(FilterSpec),
    RemoveFilter { category: FilterCategory, position: usize },
    ToggleFilterInvert { category: FilterCategory, position: usize },
    ClearFilters(Option<FilterCategory>),
    /// Fetch and show an already uploaded raster. A non-positive size is
    /// replaced by the image's pixel size.
    ShowBackground(BackgroundRef),
    /// Change the world size covered by the current raster.
    ResizeBackground { width_m: f64, height_m: f64 },
    /// Delete the raster on the server and forget it locally.
    RemoveBackground,
}

#[derive(Clone, Debug, Default)]
pub struct CommandQueue {
    seq: u64,
    pending: Vec<Command>,
}

impl CommandQueue {
    pub fn push(&mut self, command: Command) {
        self.seq += 1;
        self.pending.push(command);
    }

    /// Monotonic counter the host subscribes to.
    #[must_use]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Remove and return every pending command in push order.
    pub fn take(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.pending)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
