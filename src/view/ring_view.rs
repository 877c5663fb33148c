use kurbo::{Circle, Line, Shape};

use crate::cache::image_cache::ImageCache;
use crate::cache::key::cache_key;
use crate::foundation::core::{Rgba8, Size};
use crate::foundation::error::RingsResult;
use crate::ring::component::{RingTextOpts, TextComponent};
use crate::ring::raster::rasterize;
use crate::surface::blend::BlendMode;
use crate::surface::cpu::CpuSurface;
use crate::surface::image::RasterImage;
use crate::surface::{Brush, DrawSurface, Shadow};
use crate::text::shaper::TextShaper;
use crate::text::style::{TextStyle, WritingDirection};
use crate::view::geometry::RingGeometry;

const GUIDE_COLOR: Rgba8 = Rgba8::new(0, 160, 255, 200);
const GUIDE_INSET_COLOR: Rgba8 = Rgba8::new(255, 160, 0, 200);
const GUIDE_CROSS_HALF: f64 = 8.0;
const GUIDE_TOLERANCE: f64 = 0.1;

/// A named ring of text drawn into a view, with its bitmap cached per view size.
#[derive(Clone, Debug, PartialEq)]
pub struct RingTextView {
    /// Logical name; part of the cache key.
    pub name: String,
    /// Components in ring order.
    pub components: Vec<TextComponent>,
    /// Font size as a fraction of half the inscribed square.
    pub font_ratio: f64,
    /// Per-component rotation in degrees.
    pub text_degrees: f64,
    /// How far the drawing square is pulled toward the center (0..=1).
    pub inset_ratio: f64,
    /// Shadow beneath each component.
    pub shadow: Option<Shadow>,
    /// Outline stroke width; `0` disables outlines.
    pub outline_width: f64,
    /// Outline color; `None` uses each component's color.
    pub outline_color: Option<Rgba8>,
    /// Background paint; `None` paints the first component's color.
    pub brush: Option<Brush>,
    /// How the text image is composited over the background.
    pub blend_mode: BlendMode,
    /// Draw measurement and layout guides.
    pub show_blueprint: bool,
    /// Base writing direction.
    pub direction: WritingDirection,
}

impl RingTextView {
    /// View with default ratios, no decorations and [`BlendMode::Src`] compositing.
    pub fn new(name: impl Into<String>, components: Vec<TextComponent>) -> Self {
        Self {
            name: name.into(),
            components,
            font_ratio: 0.2,
            text_degrees: 0.0,
            inset_ratio: 0.0,
            shadow: None,
            outline_width: 0.0,
            outline_color: None,
            brush: None,
            blend_mode: BlendMode::Src,
            show_blueprint: false,
            direction: WritingDirection::Ltr,
        }
    }

    /// Return a view with the given font ratio.
    pub fn with_font_ratio(mut self, font_ratio: f64) -> Self {
        self.font_ratio = font_ratio;
        self
    }

    /// Return a view rotating each component by `degrees`.
    pub fn with_text_degrees(mut self, degrees: f64) -> Self {
        self.text_degrees = degrees;
        self
    }

    /// Return a view with the given inset ratio.
    pub fn with_inset_ratio(mut self, inset_ratio: f64) -> Self {
        self.inset_ratio = inset_ratio;
        self
    }

    /// Return a view with a component shadow.
    pub fn with_shadow(mut self, shadow: Option<Shadow>) -> Self {
        self.shadow = shadow;
        self
    }

    /// Return a view with outlined components.
    pub fn with_outline(mut self, width: f64, color: Option<Rgba8>) -> Self {
        self.outline_width = width;
        self.outline_color = color;
        self
    }

    /// Return a view with a background brush.
    pub fn with_brush(mut self, brush: Option<Brush>) -> Self {
        self.brush = brush;
        self
    }

    /// Return a view compositing its text with `blend_mode`.
    pub fn with_blend_mode(mut self, blend_mode: BlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    /// Return a view with guides toggled.
    pub fn with_blueprint(mut self, show: bool) -> Self {
        self.show_blueprint = show;
        self
    }

    /// Return a view shaping in `direction`.
    pub fn with_direction(mut self, direction: WritingDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Ring layout for a view of `size`.
    pub fn geometry(&self, size: Size) -> RingGeometry {
        RingGeometry::for_size(size, self.inset_ratio, self.font_ratio)
    }

    /// Rasterizer options for a view of `size`.
    pub fn ring_opts(&self, size: Size) -> RingTextOpts {
        let geometry = self.geometry(size);
        RingTextOpts::new(size, geometry.font_size, geometry.drawing_rect)
            .with_text_degrees(self.text_degrees)
            .with_direction(self.direction)
            .with_outline(self.outline_width, self.outline_color)
            .with_shadow(self.shadow)
            .with_blueprint(self.show_blueprint)
    }

    /// Cache key for this view at `size`.
    pub fn cache_key(&self, size: Size) -> String {
        cache_key(&self.name, size)
    }

    /// Cached text bitmap for `size`, rasterized on a miss.
    ///
    /// Returns `None` for sizes without whole pixels.
    pub fn text_image<T>(
        &self,
        size: Size,
        cache: &ImageCache,
        shaper: &mut T,
    ) -> RingsResult<Option<RasterImage>>
    where
        T: TextShaper + ?Sized,
    {
        let (w, h) = size.pixel_dims();
        if size.is_empty() || w == 0 || h == 0 {
            return Ok(None);
        }
        let key = self.cache_key(size);
        let image = cache.try_get_or_compute(&key, || {
            rasterize(&self.components, &self.ring_opts(size), shaper)
        })?;
        Ok(Some(image))
    }

    /// Paint background, cached text image and optional guides onto `surface`.
    #[tracing::instrument(level = "debug", skip_all, fields(name = %self.name))]
    pub fn draw<S, T>(&self, surface: &mut S, cache: &ImageCache, shaper: &mut T) -> RingsResult<()>
    where
        S: DrawSurface,
        T: TextShaper + ?Sized,
    {
        let size = surface.size();
        let background = match (&self.brush, self.components.first()) {
            (Some(brush), _) => Some(brush.clone()),
            (None, Some(first)) => Some(Brush::solid(first.color)),
            (None, None) => None,
        };
        if let Some(brush) = background {
            surface.fill_rect(size.to_rect(), &brush)?;
        }

        if let Some(image) = self.text_image(size, cache, shaper)? {
            surface.draw_image(&image, self.blend_mode)?;
        }

        if self.show_blueprint {
            draw_guides(surface, size, self.inset_ratio)?;
        }
        Ok(())
    }

    /// Render the view offscreen into a new image of `size`.
    pub fn render<T>(&self, size: Size, cache: &ImageCache, shaper: &mut T) -> RingsResult<RasterImage>
    where
        T: TextShaper + ?Sized,
    {
        let (w, h) = size.pixel_dims();
        if size.is_empty() || w == 0 || h == 0 {
            return Ok(RasterImage::empty());
        }
        let mut surface = CpuSurface::new(w, h)?;
        self.draw(&mut surface, cache, shaper)?;
        surface.finish()
    }
}

/// Bounds square, outer circle, inset circle and center cross.
fn draw_guides<S: DrawSurface>(surface: &mut S, size: Size, inset_ratio: f64) -> RingsResult<()> {
    let bounds = RingGeometry::bounds_square(size);
    let inset = size.fit_square(size.center(), inset_ratio);
    let center = bounds.center();

    surface.stroke_path(&bounds.to_path(GUIDE_TOLERANCE), GUIDE_COLOR, 1.0)?;
    let outer = Circle::new(center, bounds.width() / 2.0);
    surface.stroke_path(&outer.to_path(GUIDE_TOLERANCE), GUIDE_COLOR, 1.0)?;
    if inset.width() > 0.0 {
        let inner = Circle::new(center, inset.width() / 2.0);
        surface.stroke_path(&inner.to_path(GUIDE_TOLERANCE), GUIDE_INSET_COLOR, 1.0)?;
    }

    let mut cross = Line::new(
        (center.x - GUIDE_CROSS_HALF, center.y),
        (center.x + GUIDE_CROSS_HALF, center.y),
    )
    .to_path(GUIDE_TOLERANCE);
    cross.extend(
        Line::new(
            (center.x, center.y - GUIDE_CROSS_HALF),
            (center.x, center.y + GUIDE_CROSS_HALF),
        )
        .path_elements(GUIDE_TOLERANCE),
    );
    surface.stroke_path(&cross, GUIDE_COLOR, 1.0)
}

/// Split `text` on `separator` into components sharing `color` and `style`.
///
/// An empty separator keeps the whole text as one component.
pub fn components_from_delimited(
    text: &str,
    separator: &str,
    color: Rgba8,
    style: &TextStyle,
) -> Vec<TextComponent> {
    let parts: Vec<&str> = if separator.is_empty() {
        vec![text]
    } else {
        text.split(separator).collect()
    };
    parts
        .into_iter()
        .map(|part| TextComponent::new(part, color).with_style(style.clone()))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/view/ring_view.rs"]
mod tests;
