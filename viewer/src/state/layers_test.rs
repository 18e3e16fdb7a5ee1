use super::*;

#[test]
fn toggling_one_layer_leaves_the_others() {
    let layers = Layers::default();
    let next = Layer::Grid.with(layers, false);
    assert!(!Layer::Grid.is_shown(&next));
    for layer in Layer::ALL.into_iter().filter(|l| *l != Layer::Grid) {
        assert_eq!(layer.is_shown(&next), layer.is_shown(&layers), "{layer:?}");
    }
}

#[test]
fn every_layer_round_trips() {
    for layer in Layer::ALL {
        let hidden = layer.with(Layers::default(), false);
        assert!(!layer.is_shown(&hidden), "{layer:?}");
        assert!(layer.is_shown(&layer.with(hidden, true)), "{layer:?}");
    }
}

#[test]
fn opacity_slider_is_clamped() {
    let layers = Layers::default();
    assert!((with_opacity_percent(layers, "40").background_opacity - 0.4).abs() < 1e-9);
    assert!((with_opacity_percent(layers, "250").background_opacity - 1.0).abs() < 1e-9);
    assert!((with_opacity_percent(layers, "abc").background_opacity - 1.0).abs() < 1e-9);
}

#[test]
fn size_fields_fall_back_to_default() {
    assert!((parse_side("15360") - 15360.0).abs() < f64::EPSILON);
    assert!((parse_side(" 12.5 ") - 12.5).abs() < f64::EPSILON);
    assert!((parse_side("") - DEFAULT_SIDE_M).abs() < f64::EPSILON);
    assert!((parse_side("-3") - DEFAULT_SIDE_M).abs() < f64::EPSILON);
    assert!((parse_side("inf") - DEFAULT_SIDE_M).abs() < f64::EPSILON);
}

#[test]
fn unsized_upload_uses_pixel_size() {
    let reference = BackgroundRef { image_id: "map.png".to_owned(), width_m: 0.0, height_m: 0.0 };
    let filled = fill_size(reference, 4096, 2048);
    assert!((filled.width_m - 4096.0).abs() < f64::EPSILON);
    assert!((filled.height_m - 2048.0).abs() < f64::EPSILON);
    assert!(filled.is_valid());
}

#[test]
fn explicit_size_is_kept() {
    let reference = BackgroundRef { image_id: "map.png".to_owned(), width_m: 15360.0, height_m: 15360.0 };
    assert_eq!(fill_size(reference.clone(), 4096, 4096), reference);
}
