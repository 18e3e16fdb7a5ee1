//! Host-visible snapshot of the engine plus persisted view settings.

#[cfg(test)]
#[path = "viewer_test.rs"]
mod viewer_test;

use std::collections::BTreeMap;

use mapview::doc::Category;
use mapview::engine::{Action, EngineCore};
use mapview::error::ViewerError;
use mapview::filter::{FilterCategory, FilterDimension, FilterSpec};
use mapview::settings::{BackgroundRef, Layers};

use crate::util::persistence::Persisted;

/// Every (category, dimension) pair a filter can be built from.
pub const FILTER_DIMENSIONS: [(FilterCategory, FilterDimension); 5] = [
    (FilterCategory::Markers, FilterDimension::Usage),
    (FilterCategory::Markers, FilterDimension::GroupName),
    (FilterCategory::EventSpawns, FilterDimension::EventSpawnType),
    (FilterCategory::Territories, FilterDimension::TerritoryType),
    (FilterCategory::Territories, FilterDimension::TerritoryName),
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusLevel {
    #[default]
    Info,
    Error,
}

/// One line in the status bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    /// Bumped per message so an auto-clear timer only clears its own text.
    pub seq: u64,
}

/// Lifecycle of the current mission load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

#[derive(Clone, Debug, Default)]
pub struct ViewerState {
    /// Mission directory typed into the toolbar; persisted on load.
    pub mission_dir: String,
    pub load_status: LoadStatus,
    pub layers: Layers,
    pub filters: Vec<FilterSpec>,
    pub background: Option<BackgroundRef>,
    pub edit_mode: bool,
    pub dirty: usize,
    pub saving: bool,
    pub selected: usize,
    /// Background backend chosen at mount (`"webgl"` or `"canvas2d"`).
    pub backend: Option<&'static str>,
    pub counts: EntityCounts,
    /// Distinct values per filter dimension for the filter picker.
    pub catalog: BTreeMap<(FilterCategory, FilterDimension), Vec<String>>,
    pub status: Option<StatusMessage>,
    status_seq: u64,
}

/// Loaded entity totals shown in the status bar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EntityCounts {
    pub markers: usize,
    pub event_spawns: usize,
    pub zones: usize,
    pub spawn_points: usize,
    pub effect_areas: usize,
}

impl ViewerState {
    /// Initial snapshot seeded from browser storage; the engine catches up at mount.
    #[must_use]
    pub fn restored(persisted: Persisted) -> Self {
        Self {
            mission_dir: persisted.mission_dir,
            layers: persisted.layers,
            filters: persisted.filters,
            background: persisted.background,
            ..Self::default()
        }
    }

    /// Show an informational status line. Returns its sequence number.
    pub fn info(&mut self, text: impl Into<String>) -> u64 {
        self.push_status(text.into(), StatusLevel::Info)
    }

    /// Show an error status line. Returns its sequence number.
    pub fn error(&mut self, err: &ViewerError) -> u64 {
        self.push_status(err.to_string(), StatusLevel::Error)
    }

    fn push_status(&mut self, text: String, level: StatusLevel) -> u64 {
        self.status_seq += 1;
        self.status = Some(StatusMessage { text, level, seq: self.status_seq });
        self.status_seq
    }

    /// Clear the status line if it still shows message `seq`.
    pub fn expire_status(&mut self, seq: u64) {
        if self.status.as_ref().is_some_and(|s| s.seq == seq) {
            self.status = None;
        }
    }

    /// Fold one engine action into the snapshot.
    ///
    /// Actions that need the browser (redraws, clipboard, saves, prompts)
    /// are left to the host and ignored here.
    pub fn apply(&mut self, action: &Action) {
        match action {
            Action::EditModeChanged(enabled) => self.edit_mode = *enabled,
            Action::LayersChanged(layers) => self.layers = *layers,
            Action::FiltersChanged(specs) => self.filters.clone_from(specs),
            Action::SelectionChanged { total } => self.selected = *total,
            Action::Status(text) => {
                self.info(text.clone());
            }
            Action::Alert(text) => {
                self.push_status(text.clone(), StatusLevel::Error);
            }
            Action::SaveRequested(_) => self.saving = true,
            Action::RenderNeeded
            | Action::SetCursor(_)
            | Action::CopyToClipboard(_)
            | Action::DecisionRequired { .. } => {}
        }
    }

    /// Copy counters that change without a dedicated action.
    pub fn sync_from(&mut self, core: &EngineCore) {
        self.dirty = core.edit.dirty_count();
        self.saving = core.edit.is_save_pending();
        self.edit_mode = core.edit.is_enabled();
        self.selected = core.selected_count();
    }

    /// Rebuild entity totals and the filter value catalog after a load.
    pub fn refresh_catalog(&mut self, core: &EngineCore) {
        let store = &core.store;
        self.counts = EntityCounts {
            markers: store.markers.len(),
            event_spawns: store.event_spawns.len(),
            zones: store.len(Category::Zone),
            spawn_points: store.spawn_points.len(),
            effect_areas: store.effect_areas.len(),
        };
        self.catalog = FILTER_DIMENSIONS
            .iter()
            .map(|&(category, dimension)| ((category, dimension), core.value_catalog(category, dimension)))
            .collect();
    }

    /// Picker values for one dimension, empty when nothing is loaded.
    #[must_use]
    pub fn values_for(&self, category: FilterCategory, dimension: FilterDimension) -> &[String] {
        self.catalog.get(&(category, dimension)).map_or(&[], Vec::as_slice)
    }

    /// Filters of one category in engine order, with their per-category position.
    pub fn filters_for(&self, category: FilterCategory) -> impl Iterator<Item = (usize, &FilterSpec)> {
        self.filters.iter().filter(move |f| f.category == category).enumerate()
    }
}
