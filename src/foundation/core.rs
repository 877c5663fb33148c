use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{RingsError, RingsResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Target dimensions in (fractional) pixels.
///
/// A zero size is the "unset" sentinel: nothing is rendered and no bitmap is produced for it.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Size {
    /// The unset size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a size from width and height.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Return `true` unless both dimensions are strictly positive.
    ///
    /// NaN dimensions count as empty.
    pub fn is_empty(self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Integer pixel dimensions, truncated toward zero.
    ///
    /// Negative and NaN dimensions map to `0`.
    pub fn pixel_dims(self) -> (u32, u32) {
        (self.width as u32, self.height as u32)
    }

    /// Smaller of the two dimensions.
    pub fn min_dimension(self) -> f64 {
        self.width.min(self.height)
    }

    /// Center point of a rectangle of this size anchored at the origin.
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Rectangle of this size anchored at the origin.
    pub fn to_rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Largest square that fits this size, centered on `center` and pulled in by `inset_ratio`.
    ///
    /// Each side moves toward the center by `side / 2 * inset_ratio`, so `0.0` keeps the full
    /// square and `1.0` collapses it to a point.
    pub fn fit_square(self, center: Point, inset_ratio: f64) -> Rect {
        let half = self.min_dimension().max(0.0) / 2.0;
        let half = half - half * inset_ratio.clamp(0.0, 1.0);
        Rect::new(
            center.x - half,
            center.y - half,
            center.x + half,
            center.y + half,
        )
    }
}

/// Straight-alpha RGBA8 color.
///
/// Serialized as a hex string (`#RRGGBB` or `#RRGGBBAA`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::new(255, 0, 0, 255);
    /// Opaque green.
    pub const GREEN: Self = Self::new(0, 255, 0, 255);
    /// Opaque blue.
    pub const BLUE: Self = Self::new(0, 0, 255, 255);

    /// Create a color from straight-alpha channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Premultiply the color channels by alpha.
    pub fn premultiplied(self) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, self.a)
    }

    /// Linear interpolation in straight-alpha space.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            let af = f32::from(a);
            let bf = f32::from(b);
            (af + (bf - af) * t).round().clamp(0.0, 255.0) as u8
        };
        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }
}

impl fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

impl FromStr for Rgba8 {
    type Err = RingsError;

    fn from_str(s: &str) -> RingsResult<Self> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| RingsError::validation(format!("color '{s}' must start with '#'")))?;
        if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
            return Err(RingsError::validation(format!(
                "color '{s}' must be #RRGGBB or #RRGGBBAA"
            )));
        }
        let channel = |i: usize| -> RingsResult<u8> {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| RingsError::validation(format!("color '{s}' has invalid hex digits")))
        };
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl TryFrom<String> for Rgba8 {
    type Error = RingsError;

    fn try_from(value: String) -> RingsResult<Self> {
        value.parse()
    }
}

impl From<Rgba8> for String {
    fn from(value: Rgba8) -> Self {
        value.to_string()
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self::default()
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        let premul = |c: u8| crate::foundation::math::mul_div255(c, a);
        Self {
            r: premul(r),
            g: premul(g),
            b: premul(b),
            a,
        }
    }

    /// Channels as a byte array in RGBA order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
