#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use serde_json::json;

use super::*;

#[test]
fn layers_default_all_visible() {
    let l = Layers::default();
    assert!(l.show_grid && l.show_markers && l.show_event_spawns && l.show_territories);
    assert!(l.show_spawn_points && l.show_effect_areas && l.show_background);
    assert_eq!(l.background_opacity, 1.0);
}

#[test]
fn layers_partial_json_fills_defaults() {
    let l: Layers = serde_json::from_value(json!({"show_grid": false, "background_opacity": 0.4})).unwrap();
    assert!(!l.show_grid);
    assert!(l.show_markers);
    assert_eq!(l.background_opacity, 0.4);
}

#[test]
fn opacity_is_clamped() {
    let mut l = Layers::default();
    l.set_background_opacity(1.7);
    assert_eq!(l.background_opacity, 1.0);
    l.set_background_opacity(-0.2);
    assert_eq!(l.background_opacity, 0.0);
    l.set_background_opacity(f64::NAN);
    assert_eq!(l.background_opacity, 0.0);
}

#[test]
fn background_ref_validity() {
    let ok = BackgroundRef { image_id: "abc".to_owned(), width_m: 15360.0, height_m: 15360.0 };
    assert!(ok.is_valid());
    assert!(!BackgroundRef { image_id: String::new(), ..ok.clone() }.is_valid());
    assert!(!BackgroundRef { width_m: 0.0, ..ok.clone() }.is_valid());
    assert!(!BackgroundRef { height_m: f64::INFINITY, ..ok }.is_valid());
}
