use crate::foundation::core::{Rect, Rgba8, Size};
use crate::surface::Shadow;
use crate::text::style::{TextStyle, WritingDirection};

/// One string placed on the ring.
#[derive(Clone, Debug, PartialEq)]
pub struct TextComponent {
    /// Text to shape.
    pub text: String,
    /// Fill color.
    pub color: Rgba8,
    /// Shaping parameters; the font size is overridden by [`RingTextOpts::font_size`].
    pub style: TextStyle,
}

impl TextComponent {
    /// Component with the default style.
    pub fn new(text: impl Into<String>, color: Rgba8) -> Self {
        Self {
            text: text.into(),
            color,
            style: TextStyle::default(),
        }
    }

    /// Return a component shaped with `style`.
    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }
}

/// Parameters for one ring rasterization.
#[derive(Clone, Debug, PartialEq)]
pub struct RingTextOpts {
    /// Raster size. An empty size produces [`RasterImage::empty`](crate::RasterImage::empty).
    pub canvas_size: Size,
    /// Font size applied to every component, in pixels.
    pub font_size: f32,
    /// Anchor rectangle: text hangs from its top edge and rotates around its center.
    pub drawing_rect: Rect,
    /// Extra rotation of each component around its own box center, in degrees.
    pub text_degrees: f64,
    /// Base writing direction for shaping.
    pub direction: WritingDirection,
    /// Outline stroke width; `0` disables the stroke pass.
    pub outline_width: f64,
    /// Outline color; `None` uses each component's color.
    pub outline_color: Option<Rgba8>,
    /// Shadow painted beneath each fill.
    pub shadow: Option<Shadow>,
    /// Draw measurement boxes, baselines and offset markers.
    pub show_blueprint: bool,
}

impl RingTextOpts {
    /// Options with no rotation, outline, shadow or blueprint.
    pub fn new(canvas_size: Size, font_size: f32, drawing_rect: Rect) -> Self {
        Self {
            canvas_size,
            font_size,
            drawing_rect,
            text_degrees: 0.0,
            direction: WritingDirection::Ltr,
            outline_width: 0.0,
            outline_color: None,
            shadow: None,
            show_blueprint: false,
        }
    }

    /// Return options with a per-component rotation.
    pub fn with_text_degrees(mut self, degrees: f64) -> Self {
        self.text_degrees = degrees;
        self
    }

    /// Return options shaping in `direction`.
    pub fn with_direction(mut self, direction: WritingDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Return options with an outline stroke.
    pub fn with_outline(mut self, width: f64, color: Option<Rgba8>) -> Self {
        self.outline_width = width;
        self.outline_color = color;
        self
    }

    /// Return options with a shadow.
    pub fn with_shadow(mut self, shadow: Option<Shadow>) -> Self {
        self.shadow = shadow;
        self
    }

    /// Return options with the blueprint overlay toggled.
    pub fn with_blueprint(mut self, show: bool) -> Self {
        self.show_blueprint = show;
        self
    }
}
