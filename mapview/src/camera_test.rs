#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON * a.abs().max(b.abs()).max(1.0)
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn world_approx_eq(a: WorldPoint, b: WorldPoint) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.z, b.z)
}

fn camera(offset_x: f64, offset_y: f64, scale: f64) -> Camera {
    Camera {
        offset_x,
        offset_y,
        scale,
        bounds: WorldRect { min_x: 1000.0, max_x: 9000.0, min_z: 2000.0, max_z: 12000.0 },
    }
}

// --- Point ---

#[test]
fn point_distance() {
    assert!(approx_eq(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0));
}

#[test]
fn point_is_finite_rejects_nan() {
    assert!(Point::new(1.0, 2.0).is_finite());
    assert!(!Point::new(f64::NAN, 2.0).is_finite());
    assert!(!Point::new(1.0, f64::INFINITY).is_finite());
}

// --- WorldRect ---

#[test]
fn world_rect_from_corners_normalizes() {
    let r = WorldRect::from_corners(WorldPoint::new(20.0, -5.0), WorldPoint::new(-5.0, 20.0));
    assert_eq!(r, WorldRect { min_x: -5.0, max_x: 20.0, min_z: -5.0, max_z: 20.0 });
}

#[test]
fn world_rect_enclosing_empty_is_none() {
    assert!(WorldRect::enclosing(Vec::new()).is_none());
}

#[test]
fn world_rect_enclosing_skips_non_finite() {
    let r = WorldRect::enclosing(vec![
        WorldPoint::new(1.0, 2.0),
        WorldPoint::new(f64::NAN, 100.0),
        WorldPoint::new(-3.0, 7.0),
    ])
    .unwrap();
    assert_eq!(r, WorldRect { min_x: -3.0, max_x: 1.0, min_z: 2.0, max_z: 7.0 });
}

#[test]
fn world_rect_contains_is_inclusive() {
    let r = WorldRect { min_x: 0.0, max_x: 10.0, min_z: 0.0, max_z: 10.0 };
    assert!(r.contains(WorldPoint::new(0.0, 10.0)));
    assert!(!r.contains(WorldPoint::new(10.01, 5.0)));
}

#[test]
fn world_rect_intersect_overlap_and_disjoint() {
    let a = WorldRect { min_x: 0.0, max_x: 10.0, min_z: 0.0, max_z: 10.0 };
    let b = WorldRect { min_x: 5.0, max_x: 20.0, min_z: -5.0, max_z: 5.0 };
    assert_eq!(a.intersect(&b), Some(WorldRect { min_x: 5.0, max_x: 10.0, min_z: 0.0, max_z: 5.0 }));
    let c = WorldRect { min_x: 11.0, max_x: 12.0, min_z: 0.0, max_z: 1.0 };
    assert!(a.intersect(&c).is_none());
}

// --- Camera transform ---

#[test]
fn camera_default_is_identity_scale() {
    let cam = Camera::default();
    assert_eq!(cam.scale, 1.0);
    assert_eq!(cam.offset_x, 0.0);
    assert_eq!(cam.offset_y, 0.0);
}

#[test]
fn world_to_screen_flips_z() {
    let cam = Camera {
        offset_x: 0.0,
        offset_y: 0.0,
        scale: 1.0,
        bounds: WorldRect { min_x: 0.0, max_x: 100.0, min_z: 0.0, max_z: 100.0 },
    };
    let north = cam.world_to_screen(WorldPoint::new(0.0, 100.0));
    let south = cam.world_to_screen(WorldPoint::new(0.0, 0.0));
    assert!(north.y < south.y);
    assert_eq!(north, Point::new(0.0, 0.0));
    assert_eq!(south, Point::new(0.0, 100.0));
}

#[test]
fn world_to_screen_applies_scale_and_offset() {
    let cam = camera(10.0, 20.0, 2.0);
    let s = cam.world_to_screen(WorldPoint::new(1500.0, 11000.0));
    assert!(point_approx_eq(s, Point::new(1010.0, 2020.0)));
}

#[test]
fn screen_world_roundtrip_across_views() {
    let views = [(0.0, 0.0, 1.0), (-350.5, 220.25, 0.1), (1234.0, -987.0, 10.0), (3.3, 4.4, 0.37)];
    let points = [Point::new(0.0, 0.0), Point::new(812.5, 433.0), Point::new(-50.0, 1900.0)];
    for (ox, oy, s) in views {
        let cam = camera(ox, oy, s);
        for p in points {
            let back = cam.world_to_screen(cam.screen_to_world(p));
            assert!(point_approx_eq(back, p), "roundtrip failed for {p:?} at {ox},{oy},{s}");
        }
    }
}

#[test]
fn world_len_to_screen_uses_scale() {
    let cam = camera(0.0, 0.0, 0.5);
    assert_eq!(cam.world_len_to_screen(100.0), 50.0);
}

// --- pan ---

#[test]
fn pan_adds_to_offset() {
    let mut cam = camera(10.0, 10.0, 1.0);
    cam.pan(5.0, -15.0);
    assert_eq!(cam.offset_x, 15.0);
    assert_eq!(cam.offset_y, -5.0);
}

#[test]
fn pan_moves_world_point_on_screen_by_delta() {
    let mut cam = camera(0.0, 0.0, 3.0);
    let w = WorldPoint::new(2000.0, 5000.0);
    let before = cam.world_to_screen(w);
    cam.pan(7.0, 9.0);
    let after = cam.world_to_screen(w);
    assert!(point_approx_eq(after, Point::new(before.x + 7.0, before.y + 9.0)));
}

// --- zoom_at ---

#[test]
fn zoom_at_preserves_anchor_world_point() {
    let anchors = [Point::new(0.0, 0.0), Point::new(400.0, 300.0), Point::new(799.0, 12.5)];
    for anchor in anchors {
        for factor in [1.1, 0.9, 3.0, 0.25] {
            let mut cam = camera(-120.0, 45.0, 0.8);
            let before = cam.screen_to_world(anchor);
            cam.zoom_at(anchor, factor);
            let after = cam.screen_to_world(anchor);
            assert!(world_approx_eq(before, after), "anchor drifted for {anchor:?} x{factor}");
        }
    }
}

#[test]
fn zoom_at_clamps_to_max() {
    let mut cam = camera(0.0, 0.0, 9.0);
    cam.zoom_at(Point::new(100.0, 100.0), 5.0);
    assert_eq!(cam.scale, MAX_SCALE);
}

#[test]
fn zoom_at_clamps_to_min() {
    let mut cam = camera(0.0, 0.0, 0.2);
    cam.zoom_at(Point::new(100.0, 100.0), 0.01);
    assert_eq!(cam.scale, MIN_SCALE);
}

#[test]
fn zoom_at_clamped_still_preserves_anchor() {
    let mut cam = camera(33.0, 44.0, 9.5);
    let anchor = Point::new(250.0, 125.0);
    let before = cam.screen_to_world(anchor);
    cam.zoom_at(anchor, 4.0);
    assert!(world_approx_eq(before, cam.screen_to_world(anchor)));
}

#[test]
fn zoom_at_ignores_invalid_factor() {
    let mut cam = camera(1.0, 2.0, 1.5);
    cam.zoom_at(Point::new(0.0, 0.0), 0.0);
    cam.zoom_at(Point::new(0.0, 0.0), f64::NAN);
    assert_eq!(cam.scale, 1.5);
    assert_eq!(cam.offset_x, 1.0);
}

// --- fit_to_view ---

#[test]
fn fit_to_view_never_exceeds_one() {
    let mut cam = Camera::default();
    let extent = WorldRect { min_x: 0.0, max_x: 10.0, min_z: 0.0, max_z: 10.0 };
    cam.fit_to_view(Some(extent), Size::new(1920.0, 1080.0));
    assert_eq!(cam.scale, 1.0);
}

#[test]
fn fit_to_view_shrinks_large_worlds() {
    let mut cam = Camera::default();
    let extent = WorldRect { min_x: 0.0, max_x: 15000.0, min_z: 0.0, max_z: 7000.0 };
    cam.fit_to_view(Some(extent), Size::new(800.0, 600.0));
    assert!(cam.scale <= 1.0);
    assert!(approx_eq(cam.scale, 700.0 / 15000.0));
}

#[test]
fn fit_to_view_centers_extent() {
    let mut cam = Camera::default();
    let extent = WorldRect { min_x: 2000.0, max_x: 6000.0, min_z: 1000.0, max_z: 3000.0 };
    let viewport = Size::new(1000.0, 800.0);
    cam.fit_to_view(Some(extent), viewport);
    let center = cam.world_to_screen(WorldPoint::new(4000.0, 2000.0));
    assert!(point_approx_eq(center, Point::new(500.0, 400.0)));
}

#[test]
fn fit_to_view_keeps_padding() {
    let mut cam = Camera::default();
    let extent = WorldRect { min_x: 0.0, max_x: 9000.0, min_z: 0.0, max_z: 9000.0 };
    let viewport = Size::new(1000.0, 1000.0);
    cam.fit_to_view(Some(extent), viewport);
    let top_left = cam.world_to_screen(WorldPoint::new(0.0, 9000.0));
    assert!(approx_eq(top_left.x, FIT_PADDING_PX));
    assert!(approx_eq(top_left.y, FIT_PADDING_PX));
}

#[test]
fn fit_to_view_single_point_uses_unit_scale() {
    let mut cam = Camera::default();
    let extent = WorldRect { min_x: 50.0, max_x: 50.0, min_z: 70.0, max_z: 70.0 };
    cam.fit_to_view(Some(extent), Size::new(400.0, 400.0));
    assert_eq!(cam.scale, 1.0);
    let p = cam.world_to_screen(WorldPoint::new(50.0, 70.0));
    assert!(point_approx_eq(p, Point::new(200.0, 200.0)));
}

#[test]
fn fit_to_view_without_extent_resets() {
    let mut cam = camera(100.0, 100.0, 4.0);
    cam.fit_to_view(None, Size::new(400.0, 400.0));
    assert_eq!(cam.scale, 1.0);
    assert_eq!(cam.offset_x, 0.0);
    assert_eq!(cam.offset_y, 0.0);
}

#[test]
fn fit_to_view_tiny_viewport_stays_positive() {
    let mut cam = Camera::default();
    let extent = WorldRect { min_x: 0.0, max_x: 100.0, min_z: 0.0, max_z: 100.0 };
    cam.fit_to_view(Some(extent), Size::new(60.0, 60.0));
    assert!(cam.scale > 0.0);
}

// --- visible_world_rect ---

#[test]
fn visible_world_rect_matches_corners() {
    let cam = Camera {
        offset_x: 0.0,
        offset_y: 0.0,
        scale: 2.0,
        bounds: WorldRect { min_x: 0.0, max_x: 1000.0, min_z: 0.0, max_z: 1000.0 },
    };
    let r = cam.visible_world_rect(Size::new(200.0, 100.0));
    assert!(approx_eq(r.min_x, 0.0));
    assert!(approx_eq(r.max_x, 100.0));
    assert!(approx_eq(r.max_z, 1000.0));
    assert!(approx_eq(r.min_z, 950.0));
}
