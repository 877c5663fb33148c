use std::sync::Arc;

use crate::foundation::error::{RingsError, RingsResult};

/// Immutable raster produced by the rasterizer.
///
/// Pixels are premultiplied RGBA8, tightly packed and row-major. Clones share the same buffer;
/// equality compares pixel contents.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    data: Arc<[u8]>,
}

impl RasterImage {
    /// The zero-sized image ("no bitmap").
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Arc::from(Vec::new()),
        }
    }

    /// A fully transparent image of the given size.
    pub fn transparent(width: u32, height: u32) -> Self {
        let len = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        Self {
            width,
            height,
            data: Arc::from(vec![0u8; len]),
        }
    }

    /// Wrap premultiplied RGBA8 bytes.
    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> RingsResult<Self> {
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if data.len() != expected {
            return Err(RingsError::render(format!(
                "raster byte len mismatch: got {}, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data: Arc::from(data),
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Raw, uncompressed pixel byte count.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// Return `true` for the zero-sized image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Premultiplied pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Return `true` when every pixel has zero alpha.
    pub fn is_fully_transparent(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Number of pixels with non-zero alpha.
    pub fn count_opaque_pixels(&self) -> usize {
        self.data.chunks_exact(4).filter(|px| px[3] != 0).count()
    }

    /// Straight-alpha copy suitable for encoding with the `image` crate.
    pub fn to_rgba_image(&self) -> RingsResult<image::RgbaImage> {
        let mut bytes = self.data.to_vec();
        unpremultiply_rgba8_in_place(&mut bytes);
        image::RgbaImage::from_raw(self.width, self.height, bytes)
            .ok_or_else(|| RingsError::render("raster does not fit an RGBA image buffer"))
    }
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/image.rs"]
mod tests;
