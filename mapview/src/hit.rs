//! Hit-testing across every interactive entity category.
//!
//! Categories are scanned in [`Category::ORDER`]. Distance is measured in
//! screen pixels so the interaction radius stays constant while zooming.
//! Only a strictly closer entity replaces the current best, which makes the
//! earlier category win ties.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point, WorldRect};
use crate::consts::HIT_THRESHOLD_PX;
use crate::doc::{Category, EntityRef, EntityStore};
use crate::filter::Visibility;
use crate::settings::Layers;

/// Read-only view of everything that decides what is interactive.
#[derive(Clone, Copy)]
pub struct HitContext<'a> {
    pub store: &'a EntityStore,
    pub camera: &'a Camera,
    pub visibility: &'a Visibility,
    pub layers: &'a Layers,
    /// Spawn points only respond to the pointer while they are being edited.
    pub spawn_edit_enabled: bool,
}

impl HitContext<'_> {
    /// Whether a whole category currently takes part in interaction.
    #[must_use]
    pub fn category_shown(&self, category: Category) -> bool {
        match category {
            Category::Marker => self.layers.show_markers,
            Category::EventSpawn => self.layers.show_event_spawns,
            Category::Zone => self.layers.show_territories,
            Category::SpawnPoint => self.layers.show_spawn_points && self.spawn_edit_enabled,
        }
    }

    /// Visible entities of a category, by handle.
    pub fn candidates(&self, category: Category) -> impl Iterator<Item = EntityRef> + '_ {
        let shown = self.category_shown(category);
        (0..self.store.len(category))
            .filter(move |_| shown)
            .map(move |i| EntityRef::new(category, i))
            .filter(move |r| self.visibility.is_visible(self.store, *r))
    }
}

/// Nearest interactive entity within [`HIT_THRESHOLD_PX`] of `screen_pt`.
#[must_use]
pub fn hit_test(ctx: &HitContext<'_>, screen_pt: Point) -> Option<EntityRef> {
    let mut best: Option<(f64, EntityRef)> = None;
    for category in Category::ORDER {
        for entity in ctx.candidates(category) {
            let Some(world) = ctx.store.world_point(entity) else {
                continue;
            };
            let screen = ctx.camera.world_to_screen(world);
            if !screen.is_finite() {
                continue;
            }
            let d = screen.distance(screen_pt);
            if d >= HIT_THRESHOLD_PX {
                continue;
            }
            if best.is_none_or(|(best_d, _)| d < best_d) {
                best = Some((d, entity));
            }
        }
    }
    best.map(|(_, entity)| entity)
}

/// Every interactive entity whose position lies inside `rect`, in category order.
#[must_use]
pub fn entities_in_world_rect(ctx: &HitContext<'_>, rect: &WorldRect) -> Vec<EntityRef> {
    Category::ORDER
        .iter()
        .flat_map(|c| ctx.candidates(*c))
        .filter(|r| ctx.store.world_point(*r).is_some_and(|p| rect.contains(p)))
        .collect()
}
