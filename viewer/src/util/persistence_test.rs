use std::collections::BTreeSet;

use mapview::filter::{FilterCategory, FilterDimension};

use super::*;

#[test]
fn keys_share_the_viewer_prefix() {
    for key in [MISSION_DIR_KEY, SETTINGS_KEY, FILTERS_KEY, BACKGROUND_KEY] {
        assert!(key.starts_with("map_viewer_"), "{key}");
    }
}

#[test]
fn nothing_is_stored_outside_the_browser() {
    assert_eq!(Persisted::load(), Persisted::default());
}

#[test]
fn corrupt_value_decodes_as_absent() {
    assert_eq!(decode::<Layers>(SETTINGS_KEY, "{not json"), None);
}

#[test]
fn partial_settings_fill_defaults() {
    let layers: Layers = decode(SETTINGS_KEY, r#"{"show_grid": false}"#).unwrap();
    assert!(!layers.show_grid);
    assert!(layers.show_markers);
    assert!((layers.background_opacity - 1.0).abs() < f64::EPSILON);
}

#[test]
fn filter_list_decodes_with_default_invert() {
    let raw = r#"[{"category": "markers", "dimension": "usage", "values": ["Military"]}]"#;
    let filters: Vec<FilterSpec> = decode(FILTERS_KEY, raw).unwrap();
    assert_eq!(filters.len(), 1);
    assert_eq!(filters[0].category, FilterCategory::Markers);
    assert_eq!(filters[0].dimension, FilterDimension::Usage);
    assert_eq!(filters[0].values, BTreeSet::from(["Military".to_owned()]));
    assert!(!filters[0].invert);
}

#[test]
fn background_reference_round_trips_through_json() {
    let raw = r#"{"image_id": "ab12.png", "width_m": 15360.0, "height_m": 15360.0}"#;
    let reference: BackgroundRef = decode(BACKGROUND_KEY, raw).unwrap();
    assert!(reference.is_valid());
    assert_eq!(reference.image_id, "ab12.png");
}
