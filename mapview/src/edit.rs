//! Edit session for player spawn points: drag state, dirty tracking, and the
//! save/discard lifecycle.
//!
//! The dirty map holds the original position of every spawn point with an
//! unsaved move. Originals are captured lazily, the first time a point is
//! about to move, and an entry disappears again if the point is dropped back
//! onto its original position.

#[cfg(test)]
#[path = "edit_test.rs"]
mod edit_test;

use std::collections::{BTreeMap, BTreeSet};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::camera::WorldPoint;
use crate::consts::SNAP_DECIMALS;
use crate::doc::{PlayerSpawnPoint, Position};

/// Result of asking to leave edit mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisableOutcome {
    /// Edit mode was off already, or turned off with nothing to lose.
    Disabled,
    /// Unsaved moves exist; the user must choose save or discard.
    DecisionRequired,
}

/// One spawn point in a save request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnPointUpdate {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub width: f64,
    pub height: f64,
    pub xml: String,
}

/// Batch body for the position-save endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRequest {
    pub mission_dir: String,
    pub spawn_points: Vec<SpawnPointUpdate>,
}

/// Transient state of an active drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    /// World position of the pointer at drag start.
    pub anchor: WorldPoint,
    /// Dragged indices with their offsets from the anchor.
    pub members: Vec<(usize, WorldPoint)>,
    /// Whether any member moved since the drag began.
    pub moved: bool,
}

#[derive(Debug, Clone, Default)]
pub struct EditSession {
    enabled: bool,
    dirty: BTreeMap<usize, Position>,
    drag: Option<DragState>,
    save_pending: bool,
}

impl EditSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    #[must_use]
    pub fn is_index_dirty(&self, index: usize) -> bool {
        self.dirty.contains_key(&index)
    }

    #[must_use]
    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    /// Cached original position of a modified point.
    #[must_use]
    pub fn original(&self, index: usize) -> Option<Position> {
        self.dirty.get(&index).copied()
    }

    #[must_use]
    pub fn is_save_pending(&self) -> bool {
        self.save_pending
    }

    #[must_use]
    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    #[must_use]
    pub fn is_dragging_index(&self, index: usize) -> bool {
        self.drag.as_ref().is_some_and(|d| d.members.iter().any(|(i, _)| *i == index))
    }

    /// Enter edit mode. Returns whether the mode changed.
    pub fn enable(&mut self) -> bool {
        let changed = !self.enabled;
        self.enabled = true;
        changed
    }

    /// Ask to leave edit mode. With unsaved moves the session stays enabled
    /// and the caller must resolve with save or [`EditSession::discard`].
    pub fn request_disable(&mut self) -> DisableOutcome {
        if self.is_dirty() {
            return DisableOutcome::DecisionRequired;
        }
        self.enabled = false;
        self.drag = None;
        DisableOutcome::Disabled
    }

    /// Start dragging `hit`, or the whole selection when `hit` is part of it.
    ///
    /// Refused (returns false) when edit mode is off, a save is in flight, or
    /// `hit` is out of range.
    pub fn begin_drag(
        &mut self,
        points: &[PlayerSpawnPoint],
        hit: usize,
        selection: &BTreeSet<usize>,
        anchor: WorldPoint,
    ) -> bool {
        if !self.enabled || self.save_pending || hit >= points.len() {
            return false;
        }
        let indices: Vec<usize> =
            if selection.contains(&hit) { selection.iter().copied().filter(|i| *i < points.len()).collect() } else { vec![hit] };
        let members = indices
            .into_iter()
            .map(|i| (i, WorldPoint::new(points[i].x - anchor.x, points[i].z - anchor.z)))
            .collect();
        self.drag = Some(DragState { anchor, members, moved: false });
        true
    }

    /// Move every dragged point to `pointer + offset`, unrounded.
    pub fn drag_to(&mut self, points: &mut [PlayerSpawnPoint], pointer: WorldPoint) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        if pointer == drag.anchor && !drag.moved {
            return;
        }
        drag.moved = true;
        for (index, offset) in &drag.members {
            let Some(point) = points.get_mut(*index) else {
                continue;
            };
            self.dirty.entry(*index).or_insert_with(|| point.position());
            point.x = pointer.x + offset.x;
            point.z = pointer.z + offset.z;
        }
    }

    /// Finish the drag: snap moved points and drop entries that ended where
    /// they started. Returns the indices that were dragged.
    pub fn end_drag(&mut self, points: &mut [PlayerSpawnPoint]) -> Vec<usize> {
        let Some(drag) = self.drag.take() else {
            return Vec::new();
        };
        let indices: Vec<usize> = drag.members.iter().map(|(i, _)| *i).collect();
        if !drag.moved {
            return indices;
        }
        for index in &indices {
            let Some(point) = points.get_mut(*index) else {
                continue;
            };
            point.set_position(snap_position(point.position()));
            if self.dirty.get(index).is_some_and(|orig| *orig == point.position()) {
                self.dirty.remove(index);
            }
        }
        indices
    }

    /// Restore every modified point to its original position and clear the
    /// dirty map. Returns how many points were restored.
    pub fn discard(&mut self, points: &mut [PlayerSpawnPoint]) -> usize {
        self.drag = None;
        let dirty = std::mem::take(&mut self.dirty);
        let restored = dirty.len();
        for (index, original) in dirty {
            if let Some(point) = points.get_mut(index) {
                point.set_position(original);
            }
        }
        info!("edit: discarded {restored} spawn point change(s)");
        restored
    }

    /// Build the batch save body for every modified point and mark a save as
    /// pending. Returns `None` when there is nothing to save or a save is
    /// already in flight.
    pub fn begin_save(&mut self, mission_dir: &str, points: &[PlayerSpawnPoint]) -> Option<SaveRequest> {
        if self.save_pending || self.dirty.is_empty() {
            return None;
        }
        let spawn_points = self
            .dirty
            .keys()
            .filter_map(|i| points.get(*i).map(|p| (*i, p)))
            .map(|(index, p)| SpawnPointUpdate {
                index,
                x: p.x,
                y: p.y,
                z: p.z,
                width: p.width,
                height: p.height,
                xml: p.source_text(),
            })
            .collect();
        self.save_pending = true;
        Some(SaveRequest { mission_dir: mission_dir.to_owned(), spawn_points })
    }

    /// The save went through: positions are now the originals.
    pub fn save_succeeded(&mut self, leave_edit_mode: bool) {
        info!("edit: saved {} spawn point change(s)", self.dirty.len());
        self.save_pending = false;
        self.dirty.clear();
        if leave_edit_mode {
            self.enabled = false;
            self.drag = None;
        }
    }

    /// The save failed: stay in edit mode and keep every change.
    pub fn save_failed(&mut self) {
        warn!("edit: save failed, keeping {} unsaved change(s)", self.dirty.len());
        self.save_pending = false;
        self.enabled = true;
    }

    /// Forget everything tied to the previous mission's indices.
    pub fn reset(&mut self) {
        self.dirty.clear();
        self.drag = None;
        self.save_pending = false;
    }
}

/// Round to [`SNAP_DECIMALS`] decimal places.
#[must_use]
pub fn snap(value: f64) -> f64 {
    let factor = 10f64.powi(SNAP_DECIMALS);
    (value * factor).round() / factor
}

fn snap_position(pos: Position) -> Position {
    Position { x: snap(pos.x), y: snap(pos.y), z: snap(pos.z) }
}
