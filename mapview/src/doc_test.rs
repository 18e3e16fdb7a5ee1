#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use serde_json::json;

use super::*;

fn marker_from(value: serde_json::Value) -> MarkerGroup {
    serde_json::from_value(value).unwrap()
}

fn territory(name: &str, zones: &[(f64, f64)]) -> Territory {
    Territory {
        name: name.to_owned(),
        territory_type: "wolf".to_owned(),
        color: Some("#336699".to_owned()),
        center_x: None,
        center_z: None,
        radius: None,
        zones: zones.iter().map(|&(x, z)| Zone { x, y: 0.0, z, radius: Some(40.0) }).collect(),
    }
}

fn sample_data() -> MissionData {
    MissionData {
        markers: vec![
            marker_from(json!({"name": "Land_Barn", "x": 10.0, "y": 1.0, "z": 20.0, "xml": "<group name=\"Land_Barn\"/>"})),
            marker_from(json!({"name": "Land_Shed", "x": -30.0, "z": 5.0})),
        ],
        event_spawns: vec![
            serde_json::from_value(json!({"name": "StaticHeliCrash", "x": 500.0, "z": 600.0, "categories": ["vehicles"]}))
                .unwrap(),
        ],
        territories: vec![territory("North", &[(1.0, 1.0), (2.0, 2.0)]), territory("South", &[(3.0, 3.0)])],
        spawn_points: vec![
            serde_json::from_value(json!({"x": 100.0, "y": 0.0, "z": 200.0, "width": 50.0, "height": 60.0})).unwrap(),
        ],
        effect_areas: vec![
            serde_json::from_value(json!({"name": "Gas", "x": 9000.0, "z": 9000.0, "radius": 75.0})).unwrap(),
        ],
    }
}

// =============================================================
// Deserialization
// =============================================================

#[test]
fn marker_missing_fields_default() {
    let m = marker_from(json!({"name": "Bare"}));
    assert!(m.x.is_nan());
    assert!(m.z.is_nan());
    assert_eq!(m.y, 0.0);
    assert!(m.xml.is_none());
    assert!(m.usage_names().is_empty());
}

#[test]
fn spawn_point_defaults_rectangle_to_hundred() {
    let p: PlayerSpawnPoint = serde_json::from_value(json!({"x": 1.0, "z": 2.0})).unwrap();
    assert_eq!(p.width, 100.0);
    assert_eq!(p.height, 100.0);
}

#[test]
fn territory_tolerates_missing_optional_fields() {
    let t: Territory = serde_json::from_value(json!({"name": "T", "zones": [{"x": 1.0, "z": 2.0}]})).unwrap();
    assert!(t.color.is_none());
    assert_eq!(t.zones.len(), 1);
    assert!(t.zones[0].radius.is_none());
}

// =============================================================
// Usage / container names
// =============================================================

#[test]
fn usage_names_from_string_list() {
    let m = marker_from(json!({"usage": ["Military", "  Police  ", ""]}));
    assert_eq!(m.usage_names(), vec!["Military", "Police"]);
}

#[test]
fn usage_names_from_object_list() {
    let m = marker_from(json!({"usage": [{"name": "Farm"}, {"other": 1}]}));
    assert_eq!(m.usage_names(), vec!["Farm"]);
}

#[test]
fn usage_names_from_single_object_and_string() {
    assert_eq!(marker_from(json!({"usage": {"name": "Town"}})).usage_names(), vec!["Town"]);
    assert_eq!(marker_from(json!({"usage": " Village "})).usage_names(), vec!["Village"]);
}

#[test]
fn padded_object_names_are_trimmed_before_dedup() {
    let m = marker_from(json!({"usage": [" Military ", {"name": " Military "}, {"name": "Military"}]}));
    assert_eq!(m.usage_names(), vec!["Military"]);
}

#[test]
fn usage_names_merge_proto_children_and_dedup() {
    let m = marker_from(json!({
        "usage": ["Military"],
        "proto_children": {"usage": [{"name": "Military"}, "Industrial"]}
    }));
    assert_eq!(m.usage_names(), vec!["Military", "Industrial"]);
}

#[test]
fn container_names_from_all_sources() {
    let m = marker_from(json!({
        "proto_children": {
            "container": {"name": "lootFloor"},
            "containers": ["lootShelves", {"name": "lootFloor"}]
        },
        "container": "lootTable"
    }));
    assert_eq!(m.container_names(), vec!["lootFloor", "lootShelves", "lootTable"]);
}

#[test]
fn container_names_ignore_non_array_containers_key() {
    let m = marker_from(json!({"proto_children": {"containers": "single"}}));
    assert!(m.container_names().is_empty());
}

// =============================================================
// Spawn point source text
// =============================================================

#[test]
fn spawn_source_text_prefers_raw_xml() {
    let p: PlayerSpawnPoint =
        serde_json::from_value(json!({"x": 1.0, "z": 2.0, "xml": "<pos x=\"1\" z=\"2\" custom=\"a\"/>"})).unwrap();
    assert_eq!(p.source_text(), "<pos x=\"1\" z=\"2\" custom=\"a\"/>");
}

#[test]
fn spawn_source_text_synthesized_from_position() {
    let p: PlayerSpawnPoint = serde_json::from_value(json!({"x": 1.5, "z": 2.25})).unwrap();
    assert_eq!(p.source_text(), "<pos x=\"1.5\" z=\"2.25\"/>");
}

// =============================================================
// EntityStore
// =============================================================

#[test]
fn store_new_is_empty() {
    let store = EntityStore::new();
    assert!(store.is_empty());
    assert_eq!(store.len(Category::Zone), 0);
}

#[test]
fn load_flattens_zones_in_territory_order() {
    let mut store = EntityStore::new();
    store.load(sample_data());
    assert_eq!(store.len(Category::Zone), 3);
    assert_eq!(store.zone_slot(0), Some(ZoneSlot { territory: 0, zone: 0 }));
    assert_eq!(store.zone_slot(1), Some(ZoneSlot { territory: 0, zone: 1 }));
    assert_eq!(store.zone_slot(2), Some(ZoneSlot { territory: 1, zone: 0 }));
    assert!(store.zone_slot(3).is_none());
    let (t, z) = store.zone(2).unwrap();
    assert_eq!(t.name, "South");
    assert_eq!(z.x, 3.0);
}

#[test]
fn load_replaces_previous_collections() {
    let mut store = EntityStore::new();
    store.load(sample_data());
    store.load(MissionData { markers: vec![marker_from(json!({"x": 0.0, "z": 0.0}))], ..MissionData::default() });
    assert_eq!(store.len(Category::Marker), 1);
    assert_eq!(store.len(Category::Zone), 0);
    assert_eq!(store.len(Category::SpawnPoint), 0);
    assert!(store.effect_areas.is_empty());
}

#[test]
fn position_per_category() {
    let mut store = EntityStore::new();
    store.load(sample_data());
    assert_eq!(store.position(EntityRef::new(Category::Marker, 0)), Some(Position { x: 10.0, y: 1.0, z: 20.0 }));
    assert_eq!(store.world_point(EntityRef::new(Category::EventSpawn, 0)), Some(WorldPoint::new(500.0, 600.0)));
    assert_eq!(store.world_point(EntityRef::new(Category::Zone, 1)), Some(WorldPoint::new(2.0, 2.0)));
    assert_eq!(store.world_point(EntityRef::new(Category::SpawnPoint, 0)), Some(WorldPoint::new(100.0, 200.0)));
    assert!(store.position(EntityRef::new(Category::Marker, 9)).is_none());
}

#[test]
fn source_text_only_for_markers_and_spawn_points() {
    let mut store = EntityStore::new();
    store.load(sample_data());
    assert_eq!(store.source_text(EntityRef::new(Category::Marker, 0)).as_deref(), Some("<group name=\"Land_Barn\"/>"));
    assert!(store.source_text(EntityRef::new(Category::Marker, 1)).is_none());
    assert!(store.source_text(EntityRef::new(Category::SpawnPoint, 0)).is_some());
    assert!(store.source_text(EntityRef::new(Category::EventSpawn, 0)).is_none());
}

#[test]
fn marker_extent_covers_markers_only() {
    let mut store = EntityStore::new();
    store.load(sample_data());
    let r = store.marker_extent().unwrap();
    assert_eq!(r, WorldRect { min_x: -30.0, max_x: 10.0, min_z: 5.0, max_z: 20.0 });
}

#[test]
fn full_extent_includes_every_category() {
    let mut store = EntityStore::new();
    store.load(sample_data());
    let r = store.full_extent().unwrap();
    assert_eq!(r.min_x, -30.0);
    assert_eq!(r.max_x, 9000.0);
    assert_eq!(r.min_z, 1.0);
    assert_eq!(r.max_z, 9000.0);
}

#[test]
fn marker_extent_none_without_markers() {
    let store = EntityStore::new();
    assert!(store.marker_extent().is_none());
}

#[test]
fn category_order_is_fixed() {
    assert_eq!(Category::ORDER, [Category::Marker, Category::EventSpawn, Category::Zone, Category::SpawnPoint]);
}
