use crate::foundation::core::{Affine, Point};

/// 64-bit FNV-1a digest of `bytes`.
pub(crate) fn fnv1a64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |h, &b| {
        (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    })
}

/// `a * b / 255`, rounded to nearest.
pub(crate) fn mul_div255(a: u8, b: u8) -> u8 {
    let t = u32::from(a) * u32::from(b) + 128;
    (((t >> 8) + t) >> 8) as u8
}

/// Rotation by `degrees` (clockwise in y-down screen space) around `pivot`.
pub(crate) fn rotation_about(degrees: f64, pivot: Point) -> Affine {
    Affine::rotate_about(degrees.to_radians(), pivot)
}

/// Gaussian sigma for a shadow blur radius, matching the usual radius-to-sigma convention.
pub(crate) fn blur_radius_to_sigma(radius: f32) -> f32 {
    if radius > 0.0 {
        radius * 0.57735 + 0.5
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
