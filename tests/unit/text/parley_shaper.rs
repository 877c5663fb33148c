use super::*;

fn dejavu_sans() -> FontBytes {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data/fonts/DejaVuSans.ttf");
    FontBytes::new(std::fs::read(path).unwrap())
}

#[test]
fn shaping_without_any_font_is_a_measurement_error() {
    let mut shaper = ParleyShaper::new();
    let err = shaper
        .shape("A", &TextStyle::new(), WritingDirection::Ltr)
        .unwrap_err();
    assert!(matches!(err, RingsError::Measurement(_)));
}

#[test]
fn non_positive_font_size_is_rejected_before_font_lookup() {
    let mut shaper = ParleyShaper::new();
    let err = shaper
        .shape(
            "A",
            &TextStyle::new().with_font_size(0.0),
            WritingDirection::Ltr,
        )
        .unwrap_err();
    assert!(matches!(err, RingsError::Validation(_)));
}

#[test]
fn garbage_font_bytes_do_not_register() {
    let mut shaper = ParleyShaper::new();
    let err = shaper
        .register_font(&FontBytes::new(vec![0u8; 16]))
        .unwrap_err();
    assert!(matches!(err, RingsError::Measurement(_)));
    assert!(shaper.default_family().is_none());
}

#[test]
fn shapes_text_with_a_registered_font() {
    let font = dejavu_sans();
    let mut shaper = ParleyShaper::with_default_font(&font).unwrap();
    let first = shaper.register_font(&font).unwrap();
    assert_eq!(first, "DejaVu Sans");
    assert_eq!(shaper.default_family(), Some(first.as_str()));

    let style = TextStyle::new().with_font_size(40.0);
    let shaped = shaper.shape("AB", &style, WritingDirection::Ltr).unwrap();
    assert!(shaped.bounds.width > 0.0);
    assert!(shaped.bounds.height > 0.0);
    assert!(shaped.bounds.baseline > 0.0 && shaped.bounds.baseline <= shaped.bounds.height);
    assert!(!shaped.is_blank());

    let blank = shaper.shape("", &style, WritingDirection::Rtl).unwrap();
    assert!(blank.is_blank());
    assert_eq!(blank.bounds.width, 0.0);
}

#[test]
fn outline_sits_inside_the_bounds_and_on_the_baseline() {
    let mut shaper = ParleyShaper::with_default_font(&dejavu_sans()).unwrap();
    let style = TextStyle::new().with_font_size(40.0);

    for text in ["A", "HAX", "Mitre"] {
        let shaped = shaper.shape(text, &style, WritingDirection::Ltr).unwrap();
        let b = shaped.bounds;
        let bbox = kurbo::Shape::bounding_box(&shaped.outline);
        assert!(bbox.width() > 0.0 && bbox.height() > 0.0, "{text}: {bbox:?}");
        assert!(bbox.x0 >= -0.5 && bbox.x1 <= b.width + 0.5, "{text}: {bbox:?} vs {b:?}");
        assert!(bbox.y0 >= 0.0, "{text}: {bbox:?}");
        // None of these glyphs have descenders.
        assert!(bbox.y1 <= b.baseline + 0.5, "{text}: {bbox:?} vs {b:?}");
        assert!(b.baseline <= b.height);
        assert!(bbox.y0 < b.baseline * 0.5, "{text}: cap height reaches the top half");
    }
}

#[test]
fn descenders_reach_below_the_baseline() {
    let mut shaper = ParleyShaper::with_default_font(&dejavu_sans()).unwrap();
    let shaped = shaper
        .shape("gjpq", &TextStyle::new().with_font_size(40.0), WritingDirection::Ltr)
        .unwrap();
    let bbox = kurbo::Shape::bounding_box(&shaped.outline);
    assert!(bbox.y1 > shaped.bounds.baseline);
    assert!(bbox.y1 <= shaped.bounds.height + 0.5);
}

#[test]
fn writing_direction_does_not_move_the_outline() {
    let mut shaper = ParleyShaper::with_default_font(&dejavu_sans()).unwrap();
    let style = TextStyle::new().with_font_size(32.0);
    let ltr = shaper.shape("North", &style, WritingDirection::Ltr).unwrap();
    let rtl = shaper.shape("North", &style, WritingDirection::Rtl).unwrap();
    assert_eq!(ltr.bounds, rtl.bounds);
    assert_eq!(
        kurbo::Shape::bounding_box(&ltr.outline),
        kurbo::Shape::bounding_box(&rtl.outline)
    );
}

#[test]
fn carried_font_is_registered_on_demand() {
    let font = dejavu_sans();
    let mut shaper = ParleyShaper::new();
    let style = TextStyle::new().with_font_size(20.0).with_font(font.clone());
    let shaped = shaper.shape("E", &style, WritingDirection::Ltr).unwrap();
    assert!(!shaped.is_blank());
    assert_eq!(shaper.default_family(), Some("DejaVu Sans"));
}
