pub(crate) mod blend;
pub(crate) mod blur;
pub(crate) mod cpu;
pub(crate) mod image;

use crate::foundation::core::{Affine, BezPath, Point, Rect, Rgba8, Size, Vec2};
use crate::foundation::error::RingsResult;
use crate::foundation::math::rotation_about;
use crate::surface::blend::BlendMode;
use crate::surface::image::RasterImage;

/// Drop shadow painted beneath a filled path.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Shadow {
    /// Shadow color.
    pub color: Rgba8,
    /// Offset from the path, in device pixels.
    #[serde(default)]
    pub offset: Vec2,
    /// Blur radius in pixels; `0` draws a hard shadow.
    #[serde(default)]
    pub blur_radius: f32,
}

impl Shadow {
    /// Hard shadow of `color` at `offset`.
    pub fn new(color: Rgba8, offset: Vec2) -> Self {
        Self {
            color,
            offset,
            blur_radius: 0.0,
        }
    }

    /// Return a shadow with the given blur radius.
    pub fn with_blur_radius(mut self, blur_radius: f32) -> Self {
        self.blur_radius = blur_radius;
        self
    }
}

/// Paint used to fill rectangles.
///
/// Gradient coordinates are in the local space of the fill.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Brush {
    /// A single color.
    Solid {
        /// Fill color.
        color: Rgba8,
    },
    /// Evenly spaced color stops along the segment `start -> end`, clamped at both ends.
    LinearGradient {
        /// Position of the first stop.
        start: Point,
        /// Position of the last stop.
        end: Point,
        /// Stop colors.
        colors: Vec<Rgba8>,
    },
    /// Evenly spaced color stops swept clockwise around `center`, starting at 12 o'clock.
    SweepGradient {
        /// Sweep center.
        center: Point,
        /// Stop colors.
        colors: Vec<Rgba8>,
    },
}

impl Brush {
    /// Solid brush of `color`.
    pub fn solid(color: Rgba8) -> Self {
        Self::Solid { color }
    }

    /// Return the single color of a solid brush.
    pub fn as_solid(&self) -> Option<Rgba8> {
        match self {
            Self::Solid { color } => Some(*color),
            _ => None,
        }
    }

    /// Straight-alpha color of the brush at `p`.
    pub fn color_at(&self, p: Point) -> Rgba8 {
        match self {
            Self::Solid { color } => *color,
            Self::LinearGradient { start, end, colors } => {
                let axis = *end - *start;
                let len2 = axis.hypot2();
                let t = if len2 > 0.0 {
                    (p - *start).dot(axis) / len2
                } else {
                    0.0
                };
                sample_stops(colors, t)
            }
            Self::SweepGradient { center, colors } => {
                let d = p - *center;
                // atan2(dx, -dy) is 0 at 12 o'clock and grows clockwise in y-down space.
                let turns = d.x.atan2(-d.y) / std::f64::consts::TAU;
                sample_stops(colors, turns.rem_euclid(1.0))
            }
        }
    }
}

fn sample_stops(colors: &[Rgba8], t: f64) -> Rgba8 {
    match colors {
        [] => Rgba8::TRANSPARENT,
        [only] => *only,
        _ => {
            let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
            let scaled = t * (colors.len() - 1) as f64;
            let i = (scaled.floor() as usize).min(colors.len() - 2);
            colors[i].lerp(colors[i + 1], (scaled - i as f64) as f32)
        }
    }
}

/// 2D raster target with a current transform.
///
/// Geometry passed to the drawing methods is in local coordinates and mapped to device pixels by
/// [`DrawSurface::transform`]. Scoped helpers restore the previous transform when their closure
/// returns, including on error.
pub trait DrawSurface {
    /// Device size in pixels.
    fn size(&self) -> Size;

    /// Current local-to-device transform.
    fn transform(&self) -> Affine;

    /// Replace the current transform.
    fn set_transform(&mut self, transform: Affine);

    /// Fill `rect` with `brush`.
    fn fill_rect(&mut self, rect: Rect, brush: &Brush) -> RingsResult<()>;

    /// Fill `path` with `color`, painting `shadow` beneath it when present.
    fn fill_path(&mut self, path: &BezPath, color: Rgba8, shadow: Option<&Shadow>)
    -> RingsResult<()>;

    /// Stroke `path` with `color` at `width` (local units).
    fn stroke_path(&mut self, path: &BezPath, color: Rgba8, width: f64) -> RingsResult<()>;

    /// Composite `image` at the device origin, ignoring the current transform.
    fn draw_image(&mut self, image: &RasterImage, blend: BlendMode) -> RingsResult<()>;

    /// Run `f` with `transform` appended to the current transform.
    fn with_transform<R>(
        &mut self,
        transform: Affine,
        f: impl FnOnce(&mut Self) -> RingsResult<R>,
    ) -> RingsResult<R>
    where
        Self: Sized,
    {
        let saved = self.transform();
        self.set_transform(saved * transform);
        let out = f(self);
        self.set_transform(saved);
        out
    }

    /// Run `f` rotated by `degrees` around `pivot` (local coordinates).
    ///
    /// A zero rotation leaves the transform untouched.
    fn rotate<R>(
        &mut self,
        degrees: f64,
        pivot: Point,
        f: impl FnOnce(&mut Self) -> RingsResult<R>,
    ) -> RingsResult<R>
    where
        Self: Sized,
    {
        if degrees == 0.0 {
            return f(self);
        }
        self.with_transform(rotation_about(degrees, pivot), f)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/mod.rs"]
mod tests;
