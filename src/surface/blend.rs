use crate::foundation::error::{RingsError, RingsResult};
use crate::foundation::math::mul_div255;

/// How a source layer is combined with the destination.
///
/// The Porter-Duff modes operate on premultiplied alpha; the separable modes (`Multiply` and
/// below) composite source-over with the blend function applied to unpremultiplied color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Both source and destination are dropped.
    Clear,
    /// Source replaces destination.
    Src,
    /// Destination is kept.
    Dst,
    /// Source over destination.
    #[default]
    SrcOver,
    /// Destination over source.
    DstOver,
    /// Source where the destination is.
    SrcIn,
    /// Destination where the source is.
    DstIn,
    /// Source where the destination is not.
    SrcOut,
    /// Destination where the source is not.
    DstOut,
    /// Source atop destination.
    SrcAtop,
    /// Destination atop source.
    DstAtop,
    /// Source and destination where they do not overlap.
    Xor,
    /// Saturating sum.
    Plus,
    /// Channel product.
    Multiply,
    /// Inverse product of inverses.
    Screen,
    /// Multiply or screen depending on the destination.
    Overlay,
    /// Per-channel minimum.
    Darken,
    /// Per-channel maximum.
    Lighten,
    /// Absolute difference.
    Difference,
}

/// Combine equal-length premultiplied RGBA8 buffers in place: `dst = src (mode) dst`.
pub(crate) fn blend_rgba8_premul(dst: &mut [u8], src: &[u8], mode: BlendMode) -> RingsResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(RingsError::render(
            "blend_rgba8_premul expects equal-length rgba8 buffers",
        ));
    }

    // Mode dispatch happens once per call; each branch monomorphizes its own kernel.
    match mode {
        BlendMode::Clear => {
            dst.fill(0);
            Ok(())
        }
        BlendMode::Src => {
            dst.copy_from_slice(src);
            Ok(())
        }
        BlendMode::Dst => Ok(()),
        BlendMode::SrcOver => premul_over_in_place(dst, src),
        BlendMode::DstOver => porter_duff(dst, src, |_, da| (255 - da, 255)),
        BlendMode::SrcIn => porter_duff(dst, src, |_, da| (da, 0)),
        BlendMode::DstIn => porter_duff(dst, src, |sa, _| (0, sa)),
        BlendMode::SrcOut => porter_duff(dst, src, |_, da| (255 - da, 0)),
        BlendMode::DstOut => porter_duff(dst, src, |sa, _| (0, 255 - sa)),
        BlendMode::SrcAtop => porter_duff(dst, src, |sa, da| (da, 255 - sa)),
        BlendMode::DstAtop => porter_duff(dst, src, |sa, da| (255 - da, sa)),
        BlendMode::Xor => porter_duff(dst, src, |sa, da| (255 - da, 255 - sa)),
        BlendMode::Plus => porter_duff(dst, src, |_, _| (255, 255)),
        BlendMode::Multiply => separable(dst, src, |s, d| s * d),
        BlendMode::Screen => separable(dst, src, |s, d| s + d - s * d),
        BlendMode::Overlay => separable(dst, src, |s, d| {
            if d <= 0.5 {
                2.0 * s * d
            } else {
                1.0 - 2.0 * (1.0 - s) * (1.0 - d)
            }
        }),
        BlendMode::Darken => separable(dst, src, |s, d| s.min(d)),
        BlendMode::Lighten => separable(dst, src, |s, d| s.max(d)),
        BlendMode::Difference => separable(dst, src, |s, d| (d - s).abs()),
    }
}

/// Source-over for premultiplied RGBA8.
pub(crate) fn premul_over_in_place(dst: &mut [u8], src: &[u8]) -> RingsResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(RingsError::render(
            "premul_over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        let inv = 255 - s[3];
        for c in 0..4 {
            d[c] = s[c].saturating_add(mul_div255(d[c], inv));
        }
    }
    Ok(())
}

/// Porter-Duff kernel: `out = src * fa + dst * fb`, with `(fa, fb)` derived from the alphas.
#[inline(always)]
fn porter_duff<F>(dst: &mut [u8], src: &[u8], factors: F) -> RingsResult<()>
where
    F: Fn(u8, u8) -> (u8, u8),
{
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let (fa, fb) = factors(s[3], d[3]);
        for c in 0..4 {
            d[c] = mul_div255(s[c], fa).saturating_add(mul_div255(d[c], fb));
        }
    }
    Ok(())
}

#[inline(always)]
fn separable<F>(dst: &mut [u8], src: &[u8], blend_fn: F) -> RingsResult<()>
where
    F: Fn(f32, f32) -> f32,
{
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        // out_a = sa + da * (1 - sa)
        // out_p = sp * (1 - da) + dp * (1 - sa) + B(sc, dc) * sa * da
        let sa = f32::from(s[3]) / 255.0;
        if sa <= 0.0 {
            continue;
        }
        let da = f32::from(d[3]) / 255.0;
        let out_a = (sa + da * (1.0 - sa)).clamp(0.0, 1.0);

        for c in 0..3 {
            let sp = f32::from(s[c]) / 255.0;
            let dp = f32::from(d[c]) / 255.0;
            let sc = (sp / sa).clamp(0.0, 1.0);
            let dc = if da > 0.0 {
                (dp / da).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let b = blend_fn(sc, dc).clamp(0.0, 1.0);
            let out_p = (sp * (1.0 - da) + dp * (1.0 - sa) + b * sa * da).clamp(0.0, 1.0);
            d[c] = (out_p * 255.0).round() as u8;
        }
        d[3] = (out_a * 255.0).round() as u8;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/surface/blend.rs"]
mod tests;
