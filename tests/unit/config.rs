use super::*;

fn parse(json: &str) -> RingsResult<RingConfig> {
    RingConfig::from_reader(json.as_bytes())
}

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("rings-config-{tag}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn minimal_config_uses_view_defaults() {
    let cfg = parse(r##"{"name":"abc","components":[{"text":"A","color":"#ff0000"}]}"##).unwrap();
    assert_eq!(cfg.font_ratio, 0.2);
    assert_eq!(cfg.blend_mode, BlendMode::Src);
    assert_eq!(cfg.direction, WritingDirection::Ltr);
    assert!(!cfg.blueprint);

    let view = cfg.into_view(Path::new(".")).unwrap();
    assert_eq!(view.name, "abc");
    assert_eq!(view.components.len(), 1);
    assert_eq!(view.components[0].color, Rgba8::RED);
    assert!(view.components[0].style.font.is_none());
}

#[test]
fn full_config_flows_into_view() {
    let cfg = parse(
        r##"{
            "name": "full",
            "delimited": {"text": "ONE*TWO*THREE", "separator": "*", "color": "#00ff00"},
            "font_ratio": 0.25,
            "text_degrees": 90,
            "inset_ratio": 0.5,
            "outline_width": 2,
            "outline_color": "#ffffff",
            "shadow": {"color": "#00000080", "offset": {"x": 2, "y": 3}, "blur_radius": 4},
            "brush": {"kind": "solid", "color": "#000000"},
            "blend_mode": "multiply",
            "direction": "rtl",
            "blueprint": true,
            "font_weight": 700,
            "letter_spacing": 1.5
        }"##,
    )
    .unwrap();
    let view = cfg.into_view(Path::new(".")).unwrap();

    let texts: Vec<&str> = view.components.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, ["ONE", "TWO", "THREE"]);
    assert!(view.components.iter().all(|c| c.color == Rgba8::GREEN));
    assert_eq!(view.components[0].style.font_weight, 700.0);
    assert_eq!(view.components[0].style.letter_spacing, 1.5);
    assert_eq!(view.font_ratio, 0.25);
    assert_eq!(view.text_degrees, 90.0);
    assert_eq!(view.inset_ratio, 0.5);
    assert_eq!(view.outline_width, 2.0);
    assert_eq!(view.outline_color, Some(Rgba8::WHITE));
    let shadow = view.shadow.unwrap();
    assert_eq!(shadow.color, Rgba8::new(0, 0, 0, 128));
    assert_eq!(shadow.blur_radius, 4.0);
    assert_eq!(view.brush, Some(Brush::solid(Rgba8::BLACK)));
    assert_eq!(view.blend_mode, BlendMode::Multiply);
    assert_eq!(view.direction, WritingDirection::Rtl);
    assert!(view.show_blueprint);
}

#[test]
fn unknown_fields_and_bad_json_are_config_errors() {
    let err = parse(r#"{"name":"x","components":[],"bogus":1}"#).unwrap_err();
    assert!(matches!(err, RingsError::Config(_)));
    let err = parse("{").unwrap_err();
    assert!(matches!(err, RingsError::Config(_)));
}

#[test]
fn validate_rejects_missing_or_duplicate_component_sources() {
    let err = parse(r#"{"name":"x"}"#).unwrap().validate().unwrap_err();
    assert!(err.to_string().contains("components"));

    let both = parse(
        r##"{"name":"x","components":[{"text":"A","color":"#ff0000"}],
            "delimited":{"text":"A","separator":"*","color":"#ff0000"}}"##,
    )
    .unwrap();
    assert!(both.validate().is_err());
}

#[test]
fn validate_rejects_out_of_range_numbers() {
    let base = r##""name":"x","components":[{"text":"A","color":"#ff0000"}]"##;
    for extra in [
        r#""font_ratio":0"#,
        r#""inset_ratio":1.5"#,
        r#""outline_width":-1"#,
        r##""shadow":{"color":"#000000","blur_radius":-2}"##,
    ] {
        let cfg = parse(&format!("{{{base},{extra}}}")).unwrap();
        assert!(
            matches!(cfg.validate(), Err(RingsError::Config(_))),
            "expected rejection for {extra}"
        );
    }
}

#[test]
fn blank_name_is_rejected() {
    let cfg = parse(r##"{"name":"  ","components":[{"text":"A","color":"#ff0000"}]}"##).unwrap();
    assert!(cfg.validate().is_err());
}

#[test]
fn normalize_rel_path_cleans_and_rejects() {
    assert_eq!(normalize_rel_path("fonts/a.ttf").unwrap(), "fonts/a.ttf");
    assert_eq!(normalize_rel_path("./fonts//a.ttf").unwrap(), "fonts/a.ttf");
    assert_eq!(normalize_rel_path("fonts\\a.ttf").unwrap(), "fonts/a.ttf");
    assert!(normalize_rel_path("/etc/a.ttf").is_err());
    assert!(normalize_rel_path("C:/a.ttf").is_err());
    assert!(normalize_rel_path("../a.ttf").is_err());
    assert!(normalize_rel_path("fonts/../../a.ttf").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn font_is_loaded_relative_to_base_dir() {
    let dir = scratch_dir("font");
    std::fs::create_dir_all(dir.join("fonts")).unwrap();
    std::fs::write(dir.join("fonts/fake.ttf"), b"not really a font").unwrap();

    let cfg = parse(
        r##"{"name":"f","font":"fonts/fake.ttf","components":[{"text":"A","color":"#ff0000"}]}"##,
    )
    .unwrap();
    assert_eq!(cfg.font_path(&dir).unwrap(), Some(dir.join("fonts/fake.ttf")));

    let view = cfg.into_view(&dir).unwrap();
    let font = view.components[0].style.font.as_ref().unwrap();
    assert_eq!(font.as_bytes(), b"not really a font");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_font_file_is_config_error() {
    let dir = scratch_dir("missing");
    let cfg = parse(
        r##"{"name":"f","font":"nope.ttf","components":[{"text":"A","color":"#ff0000"}]}"##,
    )
    .unwrap();
    assert!(matches!(cfg.into_view(&dir), Err(RingsError::Config(_))));
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn from_path_reads_file_and_reports_missing() {
    let dir = scratch_dir("path");
    let path = dir.join("ring.json");
    std::fs::write(&path, r##"{"name":"p","components":[{"text":"A","color":"#0000ff"}]}"##)
        .unwrap();
    let cfg = RingConfig::from_path(&path).unwrap();
    assert_eq!(cfg.components[0].color, Rgba8::BLUE);

    assert!(matches!(
        RingConfig::from_path(dir.join("absent.json")),
        Err(RingsError::Config(_))
    ));
    std::fs::remove_dir_all(&dir).ok();
}
