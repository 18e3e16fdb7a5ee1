//! Per-category selection sets.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use std::collections::BTreeSet;

use crate::doc::{Category, EntityRef};

/// Selected indices, one set per category. Spawn-point selection is kept
/// apart from the read-only categories and only used while editing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSets {
    markers: BTreeSet<usize>,
    event_spawns: BTreeSet<usize>,
    zones: BTreeSet<usize>,
    spawn_points: BTreeSet<usize>,
}

impl SelectionSets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, category: Category) -> &BTreeSet<usize> {
        match category {
            Category::Marker => &self.markers,
            Category::EventSpawn => &self.event_spawns,
            Category::Zone => &self.zones,
            Category::SpawnPoint => &self.spawn_points,
        }
    }

    fn get_mut(&mut self, category: Category) -> &mut BTreeSet<usize> {
        match category {
            Category::Marker => &mut self.markers,
            Category::EventSpawn => &mut self.event_spawns,
            Category::Zone => &mut self.zones,
            Category::SpawnPoint => &mut self.spawn_points,
        }
    }

    #[must_use]
    pub fn contains(&self, entity: EntityRef) -> bool {
        self.get(entity.category).contains(&entity.index)
    }

    /// Add or remove one entity. Returns whether the set changed.
    pub fn apply(&mut self, entity: EntityRef, remove: bool) -> bool {
        let set = self.get_mut(entity.category);
        if remove { set.remove(&entity.index) } else { set.insert(entity.index) }
    }

    /// Add or remove a batch of entities. Returns how many changed.
    pub fn apply_many<I>(&mut self, entities: I, remove: bool) -> usize
    where
        I: IntoIterator<Item = EntityRef>,
    {
        entities.into_iter().filter(|e| self.apply(*e, remove)).count()
    }

    /// Drop every entity for which `keep` returns false.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(EntityRef) -> bool,
    {
        let mut removed = 0;
        for category in Category::ORDER {
            let set = self.get_mut(category);
            let before = set.len();
            set.retain(|i| keep(EntityRef::new(category, *i)));
            removed += before - set.len();
        }
        removed
    }

    pub fn clear_category(&mut self, category: Category) {
        self.get_mut(category).clear();
    }

    pub fn clear(&mut self) {
        for category in Category::ORDER {
            self.clear_category(category);
        }
    }

    /// Total selected entities across categories.
    #[must_use]
    pub fn total(&self) -> usize {
        Category::ORDER.iter().map(|c| self.get(*c).len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Every selected entity, in category then index order.
    pub fn iter(&self) -> impl Iterator<Item = EntityRef> + '_ {
        Category::ORDER
            .into_iter()
            .flat_map(move |c| self.get(c).iter().map(move |i| EntityRef::new(c, *i)))
    }
}
