#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use serde_json::json;

use super::*;

fn points(coords: &[(f64, f64)]) -> Vec<PlayerSpawnPoint> {
    coords
        .iter()
        .map(|&(x, z)| serde_json::from_value(json!({"x": x, "y": 0.0, "z": z, "width": 80.0, "height": 40.0})).unwrap())
        .collect()
}

fn none() -> BTreeSet<usize> {
    BTreeSet::new()
}

fn enabled() -> EditSession {
    let mut s = EditSession::new();
    s.enable();
    s
}

// =============================================================
// Enable / disable
// =============================================================

#[test]
fn enable_reports_change() {
    let mut s = EditSession::new();
    assert!(!s.is_enabled());
    assert!(s.enable());
    assert!(!s.enable());
    assert!(s.is_enabled());
}

#[test]
fn disable_clean_session() {
    let mut s = enabled();
    assert_eq!(s.request_disable(), DisableOutcome::Disabled);
    assert!(!s.is_enabled());
}

#[test]
fn disable_dirty_session_requires_decision() {
    let mut pts = points(&[(0.0, 0.0)]);
    let mut s = enabled();
    assert!(s.begin_drag(&pts, 0, &none(), WorldPoint::new(0.0, 0.0)));
    s.drag_to(&mut pts, WorldPoint::new(3.0, 4.0));
    s.end_drag(&mut pts);
    assert_eq!(s.request_disable(), DisableOutcome::DecisionRequired);
    assert!(s.is_enabled());
}

// =============================================================
// Drag lifecycle
// =============================================================

#[test]
fn drag_refused_when_disabled() {
    let pts = points(&[(0.0, 0.0)]);
    let mut s = EditSession::new();
    assert!(!s.begin_drag(&pts, 0, &none(), WorldPoint::new(0.0, 0.0)));
    assert!(!s.is_dragging());
}

#[test]
fn drag_refused_out_of_range() {
    let pts = points(&[(0.0, 0.0)]);
    let mut s = enabled();
    assert!(!s.begin_drag(&pts, 3, &none(), WorldPoint::new(0.0, 0.0)));
}

#[test]
fn original_cached_lazily() {
    let mut pts = points(&[(0.0, 0.0), (50.0, 50.0)]);
    let mut s = enabled();
    assert!(!s.is_dirty());
    s.begin_drag(&pts, 0, &none(), WorldPoint::new(0.0, 0.0));
    assert!(!s.is_dirty());
    s.drag_to(&mut pts, WorldPoint::new(1.0, 1.0));
    assert_eq!(s.dirty_count(), 1);
    assert_eq!(s.original(0), Some(Position { x: 0.0, y: 0.0, z: 0.0 }));
    assert!(!s.is_index_dirty(1));
}

#[test]
fn live_position_is_unrounded() {
    let mut pts = points(&[(0.0, 0.0)]);
    let mut s = enabled();
    s.begin_drag(&pts, 0, &none(), WorldPoint::new(0.0, 0.0));
    s.drag_to(&mut pts, WorldPoint::new(5.003, 5.006));
    assert_eq!(pts[0].x, 5.003);
    assert_eq!(pts[0].z, 5.006);
}

#[test]
fn end_drag_snaps_to_two_decimals() {
    let mut pts = points(&[(0.0, 0.0)]);
    let mut s = enabled();
    s.begin_drag(&pts, 0, &none(), WorldPoint::new(0.0, 0.0));
    s.drag_to(&mut pts, WorldPoint::new(5.003, 5.006));
    assert_eq!(s.end_drag(&mut pts), vec![0]);
    assert_eq!(pts[0].x, 5.0);
    assert_eq!(pts[0].y, 0.0);
    assert_eq!(pts[0].z, 5.01);
    assert!(!s.is_dragging());
}

#[test]
fn drag_keeps_grab_offset() {
    let mut pts = points(&[(10.0, 10.0)]);
    let mut s = enabled();
    s.begin_drag(&pts, 0, &none(), WorldPoint::new(12.0, 9.0));
    s.drag_to(&mut pts, WorldPoint::new(22.0, 19.0));
    assert_eq!(pts[0].x, 20.0);
    assert_eq!(pts[0].z, 20.0);
}

#[test]
fn multi_drag_moves_whole_selection() {
    let mut pts = points(&[(0.0, 0.0), (10.0, 0.0), (100.0, 100.0)]);
    let mut s = enabled();
    let selection: BTreeSet<usize> = [0, 1].into_iter().collect();
    s.begin_drag(&pts, 1, &selection, WorldPoint::new(10.0, 0.0));
    s.drag_to(&mut pts, WorldPoint::new(15.0, 5.0));
    s.end_drag(&mut pts);
    assert_eq!((pts[0].x, pts[0].z), (5.0, 5.0));
    assert_eq!((pts[1].x, pts[1].z), (15.0, 5.0));
    assert_eq!((pts[2].x, pts[2].z), (100.0, 100.0));
    assert_eq!(s.dirty_count(), 2);
}

#[test]
fn drag_of_unselected_point_ignores_selection() {
    let mut pts = points(&[(0.0, 0.0), (10.0, 0.0)]);
    let mut s = enabled();
    let selection: BTreeSet<usize> = [0].into_iter().collect();
    s.begin_drag(&pts, 1, &selection, WorldPoint::new(10.0, 0.0));
    s.drag_to(&mut pts, WorldPoint::new(20.0, 0.0));
    s.end_drag(&mut pts);
    assert_eq!(pts[0].x, 0.0);
    assert_eq!(pts[1].x, 20.0);
    assert!(!s.is_index_dirty(0));
}

#[test]
fn click_without_move_leaves_clean() {
    let mut pts = points(&[(1.234, 0.0)]);
    let mut s = enabled();
    s.begin_drag(&pts, 0, &none(), WorldPoint::new(1.234, 0.0));
    s.end_drag(&mut pts);
    assert!(!s.is_dirty());
    assert_eq!(pts[0].x, 1.234);
}

#[test]
fn returning_to_origin_drops_dirty_entry() {
    let mut pts = points(&[(2.0, 3.0)]);
    let mut s = enabled();
    s.begin_drag(&pts, 0, &none(), WorldPoint::new(2.0, 3.0));
    s.drag_to(&mut pts, WorldPoint::new(9.0, 9.0));
    s.drag_to(&mut pts, WorldPoint::new(2.001, 2.999));
    s.end_drag(&mut pts);
    assert!(!s.is_dirty());
    assert_eq!((pts[0].x, pts[0].z), (2.0, 3.0));
}

#[test]
fn second_drag_keeps_first_original() {
    let mut pts = points(&[(0.0, 0.0)]);
    let mut s = enabled();
    s.begin_drag(&pts, 0, &none(), WorldPoint::new(0.0, 0.0));
    s.drag_to(&mut pts, WorldPoint::new(1.0, 1.0));
    s.end_drag(&mut pts);
    s.begin_drag(&pts, 0, &none(), WorldPoint::new(1.0, 1.0));
    s.drag_to(&mut pts, WorldPoint::new(2.0, 2.0));
    s.end_drag(&mut pts);
    assert_eq!(s.original(0), Some(Position { x: 0.0, y: 0.0, z: 0.0 }));
}

#[test]
fn is_dragging_index_tracks_members() {
    let pts = points(&[(0.0, 0.0), (1.0, 1.0)]);
    let mut s = enabled();
    s.begin_drag(&pts, 1, &none(), WorldPoint::new(1.0, 1.0));
    assert!(s.is_dragging_index(1));
    assert!(!s.is_dragging_index(0));
}

// =============================================================
// Discard
// =============================================================

#[test]
fn discard_restores_exact_original() {
    let mut pts = points(&[(0.0, 0.0)]);
    let mut s = enabled();
    s.begin_drag(&pts, 0, &none(), WorldPoint::new(0.0, 0.0));
    s.drag_to(&mut pts, WorldPoint::new(5.003, 5.006));
    s.end_drag(&mut pts);
    assert_eq!(s.discard(&mut pts), 1);
    assert_eq!((pts[0].x, pts[0].y, pts[0].z), (0.0, 0.0, 0.0));
    assert!(!s.is_dirty());
    assert_eq!(s.request_disable(), DisableOutcome::Disabled);
}

#[test]
fn discard_mid_drag_restores_live_position() {
    let mut pts = points(&[(7.0, 7.0)]);
    let mut s = enabled();
    s.begin_drag(&pts, 0, &none(), WorldPoint::new(7.0, 7.0));
    s.drag_to(&mut pts, WorldPoint::new(8.5, 8.5));
    s.discard(&mut pts);
    assert!(!s.is_dragging());
    assert_eq!((pts[0].x, pts[0].z), (7.0, 7.0));
}

// =============================================================
// Save
// =============================================================

#[test]
fn begin_save_builds_single_batch() {
    let mut pts = points(&[(0.0, 0.0), (40.0, 40.0)]);
    let mut s = enabled();
    s.begin_drag(&pts, 0, &none(), WorldPoint::new(0.0, 0.0));
    s.drag_to(&mut pts, WorldPoint::new(5.003, 5.006));
    s.end_drag(&mut pts);

    let req = s.begin_save("mpmissions/chernarus", &pts).unwrap();
    assert_eq!(req.mission_dir, "mpmissions/chernarus");
    assert_eq!(req.spawn_points.len(), 1);
    let p = &req.spawn_points[0];
    assert_eq!((p.index, p.x, p.y, p.z), (0, 5.0, 0.0, 5.01));
    assert_eq!((p.width, p.height), (80.0, 40.0));
    assert_eq!(p.xml, "<pos x=\"5\" z=\"5.01\"/>");
    assert!(s.is_save_pending());
    assert!(s.begin_save("mpmissions/chernarus", &pts).is_none());
}

#[test]
fn begin_save_none_when_clean() {
    let pts = points(&[(0.0, 0.0)]);
    let mut s = enabled();
    assert!(s.begin_save("m", &pts).is_none());
    assert!(!s.is_save_pending());
}

#[test]
fn drag_refused_while_save_pending() {
    let mut pts = points(&[(0.0, 0.0)]);
    let mut s = enabled();
    s.begin_drag(&pts, 0, &none(), WorldPoint::new(0.0, 0.0));
    s.drag_to(&mut pts, WorldPoint::new(1.0, 0.0));
    s.end_drag(&mut pts);
    s.begin_save("m", &pts).unwrap();
    assert!(!s.begin_drag(&pts, 0, &none(), WorldPoint::new(1.0, 0.0)));
}

#[test]
fn save_success_clears_dirty_and_optionally_disables() {
    let mut pts = points(&[(0.0, 0.0)]);
    let mut s = enabled();
    s.begin_drag(&pts, 0, &none(), WorldPoint::new(0.0, 0.0));
    s.drag_to(&mut pts, WorldPoint::new(1.0, 0.0));
    s.end_drag(&mut pts);
    s.begin_save("m", &pts).unwrap();
    s.save_succeeded(false);
    assert!(!s.is_dirty());
    assert!(!s.is_save_pending());
    assert!(s.is_enabled());
    assert_eq!(pts[0].x, 1.0);
}

#[test]
fn save_success_on_disable_leaves_edit_mode() {
    let mut pts = points(&[(0.0, 0.0)]);
    let mut s = enabled();
    s.begin_drag(&pts, 0, &none(), WorldPoint::new(0.0, 0.0));
    s.drag_to(&mut pts, WorldPoint::new(1.0, 0.0));
    s.end_drag(&mut pts);
    s.begin_save("m", &pts).unwrap();
    s.save_succeeded(true);
    assert!(!s.is_enabled());
}

#[test]
fn save_failure_keeps_everything() {
    let mut pts = points(&[(0.0, 0.0)]);
    let mut s = enabled();
    s.begin_drag(&pts, 0, &none(), WorldPoint::new(0.0, 0.0));
    s.drag_to(&mut pts, WorldPoint::new(1.0, 0.0));
    s.end_drag(&mut pts);
    s.begin_save("m", &pts).unwrap();
    s.save_failed();
    assert!(s.is_enabled());
    assert!(!s.is_save_pending());
    assert_eq!(s.original(0), Some(Position { x: 0.0, y: 0.0, z: 0.0 }));
    assert_eq!(pts[0].x, 1.0);
}

#[test]
fn reset_forgets_old_indices() {
    let mut pts = points(&[(0.0, 0.0)]);
    let mut s = enabled();
    s.begin_drag(&pts, 0, &none(), WorldPoint::new(0.0, 0.0));
    s.drag_to(&mut pts, WorldPoint::new(1.0, 0.0));
    s.reset();
    assert!(!s.is_dirty());
    assert!(!s.is_dragging());
    assert!(s.is_enabled());
}

// =============================================================
// snap
// =============================================================

#[test]
fn snap_rounds_half_away() {
    assert_eq!(snap(5.003), 5.0);
    assert_eq!(snap(5.006), 5.01);
    assert_eq!(snap(-1.239), -1.24);
    assert_eq!(snap(12.0), 12.0);
}
