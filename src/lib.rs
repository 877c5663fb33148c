//! Radial text rasterization with a size-aware bitmap cache.
//!
//! A ring is a list of [`TextComponent`]s laid out evenly around a circle: component `i` of `n`
//! is rotated by `i * 360 / n` degrees about the center of the drawing square. [`rasterize`]
//! draws a ring into a [`RasterImage`] on the CPU, [`ImageCache`] keeps rendered bitmaps under a
//! byte budget, and [`RingTextView`] ties both together for one named view.
//!
//! Text measurement and outlines come from a [`TextShaper`]; [`ParleyShaper`] is the bundled
//! implementation. Drawing goes through the [`DrawSurface`] trait, implemented by
//! [`CpuSurface`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod cache;
mod config;
mod foundation;
mod ring;
mod surface;
mod text;
mod view;

#[cfg(test)]
#[path = "../tests/unit/support.rs"]
pub(crate) mod test_support;

pub use cache::image_cache::{
    CAPACITY_ENV_VAR, CacheStats, CostFn, DEFAULT_CAPACITY_BYTES, ImageCache,
};
pub use cache::key::cache_key;
pub use config::{ComponentDef, DelimitedDef, RingConfig};
pub use foundation::core::{Affine, BezPath, Point, Rect, Rgba8, Rgba8Premul, Size, Vec2};
pub use foundation::error::{RingsError, RingsResult};
pub use ring::component::{RingTextOpts, TextComponent};
pub use ring::raster::{angular_step, draw_ring_text, rasterize, ring_degrees};
pub use surface::blend::BlendMode;
pub use surface::cpu::CpuSurface;
pub use surface::image::RasterImage;
pub use surface::{Brush, DrawSurface, Shadow};
pub use text::parley_shaper::ParleyShaper;
pub use text::shaper::{ShapedText, TextBounds, TextShaper};
pub use text::style::{FontBytes, TextStyle, WritingDirection};
pub use view::geometry::RingGeometry;
pub use view::ring_view::{RingTextView, components_from_delimited};
