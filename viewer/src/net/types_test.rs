use super::*;

// =============================================================
// Envelope
// =============================================================

#[test]
fn groups_payload_is_unwrapped() {
    let body: GroupsBody = parse_envelope(
        r#"{"success": true, "count": 1, "groups": [{"name": "Land_Barn", "x": 10.5, "y": 2.0, "z": 20.25, "usage": ["Farm"]}]}"#,
    )
    .unwrap();
    assert_eq!(body.groups.len(), 1);
    assert_eq!(body.groups[0].name, "Land_Barn");
    assert_eq!(body.groups[0].usage_names(), vec!["Farm".to_owned()]);
}

#[test]
fn markers_key_is_accepted_for_groups() {
    let body: GroupsBody = parse_envelope(r#"{"markers": [{"x": 1.0, "z": 2.0}]}"#).unwrap();
    assert_eq!(body.groups.len(), 1);
}

#[test]
fn missing_collection_is_empty() {
    let body: EventSpawnsBody = parse_envelope(r#"{"success": true, "count": 0}"#).unwrap();
    assert!(body.event_spawns.is_empty());
}

#[test]
fn effect_areas_read_from_areas_key() {
    let body: EffectAreasBody =
        parse_envelope(r#"{"success": true, "areas": [{"name": "Gas", "x": 1.0, "z": 2.0, "radius": 50.0}]}"#).unwrap();
    assert_eq!(body.areas.len(), 1);
    assert!((body.areas[0].radius - 50.0).abs() < f64::EPSILON);
}

#[test]
fn server_error_becomes_network_error() {
    let err = parse_envelope::<GroupsBody>(r#"{"success": false, "error": "mapgrouppos.xml not found"}"#).unwrap_err();
    assert_eq!(err.error_code(), "E_NETWORK");
    assert!(err.to_string().contains("mapgrouppos.xml not found"));
}

#[test]
fn bare_error_without_flag_fails() {
    let err = parse_envelope::<Empty>(r#"{"error": "No mission directory specified"}"#).unwrap_err();
    assert!(err.to_string().contains("No mission directory specified"));
}

#[test]
fn failure_without_message_gets_generic_text() {
    let err = parse_envelope::<Empty>(r#"{"success": false}"#).unwrap_err();
    assert_eq!(err.to_string(), "network error: request failed");
}

#[test]
fn malformed_json_is_reported() {
    let err = parse_envelope::<Empty>("<html>502</html>").unwrap_err();
    assert!(err.to_string().contains("malformed response"));
}

#[test]
fn upload_returns_image_id() {
    let body: UploadBody =
        parse_envelope(r#"{"success": true, "image_id": "ab12.png", "message": "Image uploaded successfully"}"#).unwrap();
    assert_eq!(body.image_id, "ab12.png");
}

#[test]
fn spawn_points_keep_source_text() {
    let body: SpawnPointsBody =
        parse_envelope(r#"{"success": true, "spawn_points": [{"x": 1.0, "y": 0.0, "z": 2.0, "xml": "<pos x=\"1\"/>"}]}"#)
            .unwrap();
    assert_eq!(body.spawn_points[0].xml.as_deref(), Some("<pos x=\"1\"/>"));
}

// =============================================================
// HTTP status
// =============================================================

#[test]
fn server_message_wins_over_status() {
    let err = interpret::<GroupsBody>(404, r#"{"success": false, "error": "Mission directory does not exist: /x"}"#)
        .unwrap_err();
    assert_eq!(err.to_string(), "network error: Mission directory does not exist: /x");
}

#[test]
fn non_json_error_page_reports_status() {
    let err = interpret::<Empty>(502, "Bad Gateway").unwrap_err();
    assert_eq!(err.to_string(), "network error: HTTP 502");
}

#[test]
fn non_2xx_without_message_reports_status() {
    let err = interpret::<Empty>(500, r#"{"detail": "boom"}"#).unwrap_err();
    assert_eq!(err.to_string(), "network error: HTTP 500");
}

#[test]
fn success_status_reads_payload() {
    let body: TerritoriesBody = interpret(200, r#"{"success": true, "territories": [{"name": "wolf"}]}"#).unwrap();
    assert_eq!(body.territories[0].name, "wolf");
}

#[test]
fn rejected_save_is_a_conflict() {
    let err = save_outcome(200, r#"{"success": false, "error": "file is read-only"}"#).unwrap_err();
    assert_eq!(err.error_code(), "E_PERSISTENCE_CONFLICT");
    assert!(save_outcome(200, r#"{"success": true}"#).is_ok());
}
