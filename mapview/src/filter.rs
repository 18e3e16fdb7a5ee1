//! Filter engine: per-category visibility computed from user filter specs.
//!
//! A filter names a category, the value dimension it inspects, a set of
//! values, and whether it hides (inverted) or displays matches. For each
//! category, display filters are OR'd together and hide filters are AND-NOT'd:
//!
//! ```text
//! visible = (no display filters || any display filter matches)
//!        && (no hide filter matches)
//! ```
//!
//! Matching compares trimmed, lowercased strings. Visibility is always
//! recomputed from scratch after a mutation.

#[cfg(test)]
#[path = "filter_test.rs"]
mod filter_test;

use std::collections::BTreeSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::doc::{Category, EntityRef, EntityStore};

/// Entity collections that accept filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterCategory {
    Markers,
    EventSpawns,
    Territories,
}

/// Value dimension a filter inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterDimension {
    Usage,
    GroupName,
    EventSpawnType,
    TerritoryType,
    TerritoryName,
}

impl FilterDimension {
    /// Whether this dimension can be extracted from entities of `category`.
    #[must_use]
    pub fn valid_for(self, category: FilterCategory) -> bool {
        matches!(
            (category, self),
            (FilterCategory::Markers, Self::Usage | Self::GroupName)
                | (FilterCategory::EventSpawns, Self::EventSpawnType)
                | (FilterCategory::Territories, Self::TerritoryType | Self::TerritoryName)
        )
    }

    /// Label for pickers and filter chips.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Usage => "Usage",
            Self::GroupName => "Group Name",
            Self::EventSpawnType => "Event Spawn Type",
            Self::TerritoryType => "Territory Type",
            Self::TerritoryName => "Territory Name",
        }
    }
}

/// One user filter. Serialized as-is to local storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub category: FilterCategory,
    pub dimension: FilterDimension,
    pub values: BTreeSet<String>,
    #[serde(default)]
    pub invert: bool,
}

impl FilterSpec {
    /// Normalized value set used for matching.
    fn normalized_values(&self) -> BTreeSet<String> {
        self.values.iter().map(|v| normalize(v)).filter(|v| !v.is_empty()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("dimension {dimension:?} does not apply to {category:?}")]
    InvalidDimension { category: FilterCategory, dimension: FilterDimension },
    #[error("filter needs at least one value")]
    EmptyValues,
    #[error("an identical filter already exists")]
    Duplicate,
    #[error("no filter at position {0}")]
    NotFound(usize),
}

/// Visible indices for one category.
///
/// When no filter applies `active` is false and every index is visible.
/// An empty set means the same: a filter that matches nothing draws everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilitySet {
    members: BTreeSet<usize>,
    active: bool,
}

impl VisibilitySet {
    fn all(len: usize) -> Self {
        Self { members: (0..len).collect(), active: false }
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        !self.active || self.members.is_empty() || self.members.contains(&index)
    }

    /// Number of visible entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether at least one filter shaped this set.
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        self.active
    }
}

/// Visibility of every filterable category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visibility {
    pub markers: VisibilitySet,
    pub event_spawns: VisibilitySet,
    pub territories: VisibilitySet,
}

impl Visibility {
    #[must_use]
    pub fn get(&self, category: FilterCategory) -> &VisibilitySet {
        match category {
            FilterCategory::Markers => &self.markers,
            FilterCategory::EventSpawns => &self.event_spawns,
            FilterCategory::Territories => &self.territories,
        }
    }

    /// Whether an entity passes the filters. Zones follow their territory;
    /// spawn points are never filtered.
    #[must_use]
    pub fn is_visible(&self, store: &EntityStore, entity: EntityRef) -> bool {
        match entity.category {
            Category::Marker => self.markers.contains(entity.index),
            Category::EventSpawn => self.event_spawns.contains(entity.index),
            Category::Zone => store.zone_slot(entity.index).is_some_and(|s| self.territories.contains(s.territory)),
            Category::SpawnPoint => true,
        }
    }
}

/// The filter list plus the visibility it produces.
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    specs: Vec<FilterSpec>,
    visibility: Visibility,
}

impl FilterEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn specs(&self) -> &[FilterSpec] {
        &self.specs
    }

    #[must_use]
    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    /// Filters for one category, in insertion order.
    pub fn specs_for(&self, category: FilterCategory) -> impl Iterator<Item = &FilterSpec> {
        self.specs.iter().filter(move |s| s.category == category)
    }

    /// Validate and append a filter, then recompute.
    ///
    /// # Errors
    ///
    /// Rejects a dimension the category does not have, an empty value set, or
    /// an exact duplicate. Nothing changes on error.
    pub fn add(&mut self, spec: FilterSpec, store: &EntityStore) -> Result<(), FilterError> {
        validate(&spec)?;
        if self
            .specs
            .iter()
            .any(|s| s.category == spec.category && s.dimension == spec.dimension && s.values == spec.values)
        {
            return Err(FilterError::Duplicate);
        }
        self.specs.push(spec);
        self.recompute(store);
        Ok(())
    }

    /// Remove the `position`-th filter of `category`.
    ///
    /// # Errors
    ///
    /// [`FilterError::NotFound`] when the category has no such filter.
    pub fn remove(&mut self, category: FilterCategory, position: usize, store: &EntityStore) -> Result<FilterSpec, FilterError> {
        let index = self.global_index(category, position)?;
        let removed = self.specs.remove(index);
        self.recompute(store);
        Ok(removed)
    }

    /// Flip display/hide on the `position`-th filter of `category`.
    ///
    /// # Errors
    ///
    /// [`FilterError::NotFound`] when the category has no such filter.
    pub fn toggle_invert(&mut self, category: FilterCategory, position: usize, store: &EntityStore) -> Result<(), FilterError> {
        let index = self.global_index(category, position)?;
        self.specs[index].invert = !self.specs[index].invert;
        self.recompute(store);
        Ok(())
    }

    /// Drop every filter of `category`, or all filters when `None`.
    pub fn clear(&mut self, category: Option<FilterCategory>, store: &EntityStore) {
        match category {
            Some(c) => self.specs.retain(|s| s.category != c),
            None => self.specs.clear(),
        }
        self.recompute(store);
    }

    /// Replace the whole list, e.g. from persisted state. Invalid entries are dropped.
    pub fn restore(&mut self, specs: Vec<FilterSpec>, store: &EntityStore) {
        let mut kept: Vec<FilterSpec> = Vec::with_capacity(specs.len());
        for spec in specs {
            if validate(&spec).is_err() || kept.contains(&spec) {
                debug!("filter: dropping invalid restored filter {spec:?}");
                continue;
            }
            kept.push(spec);
        }
        self.specs = kept;
        self.recompute(store);
    }

    /// Rebuild every category's visibility from the current filter list.
    pub fn recompute(&mut self, store: &EntityStore) {
        self.visibility = Visibility {
            markers: self.compute(FilterCategory::Markers, store),
            event_spawns: self.compute(FilterCategory::EventSpawns, store),
            territories: self.compute(FilterCategory::Territories, store),
        };
        debug!(
            "filter: recomputed visibility markers={} event_spawns={} territories={}",
            self.visibility.markers.len(),
            self.visibility.event_spawns.len(),
            self.visibility.territories.len()
        );
    }

    fn compute(&self, category: FilterCategory, store: &EntityStore) -> VisibilitySet {
        let len = category_len(store, category);
        let (hide, display): (Vec<_>, Vec<_>) = self.specs_for(category).partition(|s| s.invert);
        if hide.is_empty() && display.is_empty() {
            return VisibilitySet::all(len);
        }
        let display = display.iter().map(|s| (s.dimension, s.normalized_values())).collect::<Vec<_>>();
        let hide = hide.iter().map(|s| (s.dimension, s.normalized_values())).collect::<Vec<_>>();

        let members = (0..len)
            .filter(|&i| {
                let shown = display.is_empty()
                    || display.iter().any(|(dim, values)| intersects(&extract(store, category, *dim, i), values));
                shown && !hide.iter().any(|(dim, values)| intersects(&extract(store, category, *dim, i), values))
            })
            .collect();
        VisibilitySet { members, active: true }
    }

    fn global_index(&self, category: FilterCategory, position: usize) -> Result<usize, FilterError> {
        self.specs
            .iter()
            .enumerate()
            .filter(|(_, s)| s.category == category)
            .nth(position)
            .map(|(i, _)| i)
            .ok_or(FilterError::NotFound(position))
    }
}

fn validate(spec: &FilterSpec) -> Result<(), FilterError> {
    if !spec.dimension.valid_for(spec.category) {
        return Err(FilterError::InvalidDimension { category: spec.category, dimension: spec.dimension });
    }
    if spec.normalized_values().is_empty() {
        return Err(FilterError::EmptyValues);
    }
    Ok(())
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

fn intersects(extracted: &[String], values: &BTreeSet<String>) -> bool {
    extracted.iter().any(|v| values.contains(&normalize(v)))
}

fn category_len(store: &EntityStore, category: FilterCategory) -> usize {
    match category {
        FilterCategory::Markers => store.markers.len(),
        FilterCategory::EventSpawns => store.event_spawns.len(),
        FilterCategory::Territories => store.territories.len(),
    }
}

/// Raw values of `dimension` for entity `index` of `category`.
fn extract(store: &EntityStore, category: FilterCategory, dimension: FilterDimension, index: usize) -> Vec<String> {
    match (category, dimension) {
        (FilterCategory::Markers, FilterDimension::Usage) => {
            store.markers.get(index).map(crate::doc::MarkerGroup::usage_names).unwrap_or_default()
        }
        (FilterCategory::Markers, FilterDimension::GroupName) => {
            store.markers.get(index).map(|m| vec![m.name.clone()]).unwrap_or_default()
        }
        (FilterCategory::EventSpawns, FilterDimension::EventSpawnType) => {
            store.event_spawns.get(index).map(|e| vec![e.name.clone()]).unwrap_or_default()
        }
        (FilterCategory::Territories, FilterDimension::TerritoryType) => {
            store.territories.get(index).map(|t| vec![t.territory_type.clone()]).unwrap_or_default()
        }
        (FilterCategory::Territories, FilterDimension::TerritoryName) => {
            store.territories.get(index).map(|t| vec![t.name.clone()]).unwrap_or_default()
        }
        _ => Vec::new(),
    }
}

/// Sorted distinct values of a dimension across the loaded entities, for
/// populating pickers. Values keep their original casing, trimmed.
#[must_use]
pub fn value_catalog(store: &EntityStore, category: FilterCategory, dimension: FilterDimension) -> Vec<String> {
    let set: BTreeSet<String> = (0..category_len(store, category))
        .flat_map(|i| extract(store, category, dimension, i))
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .collect();
    set.into_iter().collect()
}
