use super::*;

fn px(rgba: [u8; 4]) -> Vec<u8> {
    rgba.to_vec()
}

fn blended(dst: [u8; 4], src: [u8; 4], mode: BlendMode) -> [u8; 4] {
    let mut d = px(dst);
    blend_rgba8_premul(&mut d, &src, mode).unwrap();
    [d[0], d[1], d[2], d[3]]
}

#[test]
fn src_over_opaque_source_replaces_destination() {
    assert_eq!(
        blended([0, 0, 255, 255], [255, 0, 0, 255], BlendMode::SrcOver),
        [255, 0, 0, 255]
    );
}

#[test]
fn src_over_transparent_source_keeps_destination() {
    assert_eq!(
        blended([0, 0, 255, 255], [0, 0, 0, 0], BlendMode::SrcOver),
        [0, 0, 255, 255]
    );
}

#[test]
fn src_replaces_even_with_transparent_source() {
    assert_eq!(
        blended([0, 0, 255, 255], [0, 0, 0, 0], BlendMode::Src),
        [0, 0, 0, 0]
    );
}

#[test]
fn clear_and_dst_are_trivial() {
    assert_eq!(
        blended([1, 2, 3, 4], [9, 9, 9, 9], BlendMode::Clear),
        [0, 0, 0, 0]
    );
    assert_eq!(blended([1, 2, 3, 4], [9, 9, 9, 9], BlendMode::Dst), [1, 2, 3, 4]);
}

#[test]
fn src_in_needs_destination_coverage() {
    assert_eq!(
        blended([0, 0, 0, 0], [255, 0, 0, 255], BlendMode::SrcIn),
        [0, 0, 0, 0]
    );
    assert_eq!(
        blended([0, 0, 255, 255], [255, 0, 0, 255], BlendMode::SrcIn),
        [255, 0, 0, 255]
    );
}

#[test]
fn dst_out_punches_holes() {
    assert_eq!(
        blended([0, 0, 255, 255], [255, 0, 0, 255], BlendMode::DstOut),
        [0, 0, 0, 0]
    );
}

#[test]
fn dst_over_keeps_opaque_destination() {
    assert_eq!(
        blended([0, 0, 255, 255], [255, 0, 0, 255], BlendMode::DstOver),
        [0, 0, 255, 255]
    );
}

#[test]
fn xor_of_two_opaque_pixels_is_empty() {
    assert_eq!(
        blended([0, 0, 255, 255], [255, 0, 0, 255], BlendMode::Xor),
        [0, 0, 0, 0]
    );
}

#[test]
fn plus_saturates() {
    assert_eq!(
        blended([100, 0, 0, 100], [200, 0, 0, 200], BlendMode::Plus),
        [255, 0, 0, 255]
    );
}

#[test]
fn multiply_white_is_identity_on_opaque_destination() {
    assert_eq!(
        blended([255, 0, 0, 255], [255, 255, 255, 255], BlendMode::Multiply),
        [255, 0, 0, 255]
    );
}

#[test]
fn darken_and_lighten_pick_channels() {
    let dst = [200, 50, 0, 255];
    let src = [100, 100, 100, 255];
    assert_eq!(blended(dst, src, BlendMode::Darken), [100, 50, 0, 255]);
    assert_eq!(blended(dst, src, BlendMode::Lighten), [200, 100, 100, 255]);
}

#[test]
fn difference_of_equal_colors_is_black() {
    assert_eq!(
        blended([80, 80, 80, 255], [80, 80, 80, 255], BlendMode::Difference),
        [0, 0, 0, 255]
    );
}

#[test]
fn length_mismatch_is_an_error() {
    let mut dst = vec![0u8; 8];
    assert!(blend_rgba8_premul(&mut dst, &[0u8; 4], BlendMode::SrcOver).is_err());
    assert!(premul_over_in_place(&mut dst, &[0u8; 7]).is_err());
}

#[test]
fn blend_modes_serialize_snake_case() {
    assert_eq!(
        serde_json::to_string(&BlendMode::SrcOver).unwrap(),
        "\"src_over\""
    );
    let m: BlendMode = serde_json::from_str("\"dst_atop\"").unwrap();
    assert_eq!(m, BlendMode::DstAtop);
    assert_eq!(BlendMode::default(), BlendMode::SrcOver);
}
