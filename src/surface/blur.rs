use crate::foundation::error::{RingsError, RingsResult};

/// Total weight of a normalized kernel (Q16 fixed point).
const ONE_Q16: u32 = 1 << 16;

/// Symmetric gaussian kernel in Q16 fixed point.
///
/// Only the center tap and one side are stored; the weights of both sides plus the center sum to
/// exactly `1 << 16`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BlurKernel {
    half: Vec<u32>,
}

impl BlurKernel {
    /// Kernel for `sigma`, truncated at `ceil(3 * sigma)` taps on each side.
    ///
    /// A zero sigma gives the identity kernel.
    pub(crate) fn for_sigma(sigma: f32) -> RingsResult<Self> {
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(RingsError::validation("blur sigma must be finite and >= 0"));
        }
        let radius = (sigma * 3.0).ceil() as usize;
        if radius == 0 {
            return Ok(Self {
                half: vec![ONE_Q16],
            });
        }

        let two_sigma2 = 2.0 * f64::from(sigma).powi(2);
        let raw: Vec<f64> = (0..=radius)
            .map(|i| (-((i * i) as f64) / two_sigma2).exp())
            .collect();
        let total = raw[0] + 2.0 * raw[1..].iter().sum::<f64>();

        let mut half: Vec<u32> = raw
            .iter()
            .map(|w| (w / total * f64::from(ONE_Q16)).round() as u32)
            .collect();
        let sides: u32 = half[1..].iter().sum::<u32>() * 2;
        half[0] = ONE_Q16.saturating_sub(sides);
        Ok(Self { half })
    }

    /// Taps on each side of the center.
    pub(crate) fn radius(&self) -> usize {
        self.half.len() - 1
    }

    fn weight(&self, offset: isize) -> u32 {
        self.half[offset.unsigned_abs()]
    }
}

/// Blur a premultiplied RGBA8 image in place, treating everything outside it as transparent.
///
/// `scratch` is resized as needed and reused across calls.
pub(crate) fn blur_premul_in_place(
    pixels: &mut [u8],
    width: usize,
    height: usize,
    kernel: &BlurKernel,
    scratch: &mut Vec<u8>,
) -> RingsResult<()> {
    if pixels.len() != width * height * 4 {
        return Err(RingsError::render("blur buffer does not match its dimensions"));
    }
    if kernel.radius() == 0 || pixels.is_empty() {
        return Ok(());
    }
    scratch.clear();
    scratch.resize(pixels.len(), 0);

    let row_stride = width * 4;
    // Rows into scratch, then columns back into the image.
    convolve_lines(pixels, scratch, height, width, row_stride, 4, kernel);
    convolve_lines(scratch, pixels, width, height, 4, row_stride, kernel);
    Ok(())
}

/// One 1-D pass over `lines` lines of `len` pixels each. Line `l` starts at byte
/// `l * line_step` and its pixels are `pixel_step` bytes apart.
fn convolve_lines(
    src: &[u8],
    dst: &mut [u8],
    lines: usize,
    len: usize,
    line_step: usize,
    pixel_step: usize,
    kernel: &BlurKernel,
) {
    let radius = kernel.radius() as isize;
    let len_i = len as isize;
    for line in 0..lines {
        let base = line * line_step;
        for i in 0..len_i {
            let lo = (i - radius).max(0);
            let hi = (i + radius).min(len_i - 1);
            let mut acc = [0u32; 4];
            for j in lo..=hi {
                let w = kernel.weight(j - i);
                let at = base + j as usize * pixel_step;
                for (a, &v) in acc.iter_mut().zip(&src[at..at + 4]) {
                    *a += w * u32::from(v);
                }
            }
            let out = base + i as usize * pixel_step;
            for (d, a) in dst[out..out + 4].iter_mut().zip(acc) {
                *d = ((a + (ONE_Q16 >> 1)) >> 16).min(255) as u8;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/blur.rs"]
mod tests;
