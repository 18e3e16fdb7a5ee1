//! Draft state of the "add filter" form.

#[cfg(test)]
#[path = "filter_form_test.rs"]
mod filter_form_test;

use std::collections::BTreeSet;

use mapview::error::ViewerError;
use mapview::filter::{FilterCategory, FilterDimension, FilterSpec};

use super::viewer::FILTER_DIMENSIONS;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterDraft {
    pub category: FilterCategory,
    pub dimension: FilterDimension,
    pub values: BTreeSet<String>,
    /// Hide matching entities instead of showing only them.
    pub invert: bool,
}

impl Default for FilterDraft {
    fn default() -> Self {
        Self {
            category: FilterCategory::Markers,
            dimension: FilterDimension::Usage,
            values: BTreeSet::new(),
            invert: false,
        }
    }
}

impl FilterDraft {
    /// Switch category, resetting the dimension to the first one it supports.
    pub fn set_category(&mut self, category: FilterCategory) {
        if self.category == category {
            return;
        }
        self.category = category;
        self.dimension = dimensions_for(category).next().unwrap_or(FilterDimension::Usage);
        self.values.clear();
    }

    /// Switch dimension; ignored when the current category lacks it.
    pub fn set_dimension(&mut self, dimension: FilterDimension) {
        if dimension.valid_for(self.category) && dimension != self.dimension {
            self.dimension = dimension;
            self.values.clear();
        }
    }

    pub fn toggle_value(&mut self, value: &str) {
        if !self.values.remove(value) {
            self.values.insert(value.to_owned());
        }
    }

    /// Build the filter to submit, keeping category and dimension for the next one.
    ///
    /// # Errors
    ///
    /// [`ViewerError::Validation`] when no value is picked.
    pub fn submit(&mut self) -> Result<FilterSpec, ViewerError> {
        if self.values.is_empty() {
            return Err(ViewerError::Validation("pick at least one value".to_owned()));
        }
        Ok(FilterSpec {
            category: self.category,
            dimension: self.dimension,
            values: std::mem::take(&mut self.values),
            invert: self.invert,
        })
    }
}

/// Dimensions offered for `category`, in picker order.
pub fn dimensions_for(category: FilterCategory) -> impl Iterator<Item = FilterDimension> {
    FILTER_DIMENSIONS.into_iter().filter(move |(c, _)| *c == category).map(|(_, d)| d)
}

/// Label for category pickers and filter group headings.
#[must_use]
pub fn category_label(category: FilterCategory) -> &'static str {
    match category {
        FilterCategory::Markers => "Markers",
        FilterCategory::EventSpawns => "Event Spawns",
        FilterCategory::Territories => "Territories",
    }
}

/// Stable form value for a category `<select>`.
#[must_use]
pub fn category_key(category: FilterCategory) -> &'static str {
    match category {
        FilterCategory::Markers => "markers",
        FilterCategory::EventSpawns => "event_spawns",
        FilterCategory::Territories => "territories",
    }
}

#[must_use]
pub fn parse_category(key: &str) -> Option<FilterCategory> {
    [FilterCategory::Markers, FilterCategory::EventSpawns, FilterCategory::Territories]
        .into_iter()
        .find(|c| category_key(*c) == key)
}

/// Stable form value for a dimension `<select>`.
#[must_use]
pub fn dimension_key(dimension: FilterDimension) -> &'static str {
    match dimension {
        FilterDimension::Usage => "usage",
        FilterDimension::GroupName => "group_name",
        FilterDimension::EventSpawnType => "event_spawn_type",
        FilterDimension::TerritoryType => "territory_type",
        FilterDimension::TerritoryName => "territory_name",
    }
}

#[must_use]
pub fn parse_dimension(key: &str) -> Option<FilterDimension> {
    FILTER_DIMENSIONS.into_iter().map(|(_, d)| d).find(|d| dimension_key(*d) == key)
}

/// One-line summary for a filter chip, e.g. `Hide Usage: Military, Police`.
#[must_use]
pub fn describe(spec: &FilterSpec) -> String {
    let mode = if spec.invert { "Hide" } else { "Show" };
    let values: Vec<&str> = spec.values.iter().map(String::as_str).collect();
    format!("{mode} {}: {}", spec.dimension.label(), values.join(", "))
}
