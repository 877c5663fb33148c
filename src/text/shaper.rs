use crate::foundation::core::{BezPath, Rect};
use crate::foundation::error::RingsResult;
use crate::text::style::{TextStyle, WritingDirection};

/// Tight measurement box of a shaped string.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextBounds {
    /// Advance width in pixels.
    pub width: f64,
    /// Line box height in pixels.
    pub height: f64,
    /// Offset of the last baseline from the top of the box.
    pub baseline: f64,
}

impl TextBounds {
    /// The bounding box anchored at the origin.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// A measured string together with its glyph outlines.
///
/// `outline` lives in the bounds' local space: the origin is the top-left corner of
/// [`TextBounds::rect`].
#[derive(Clone, Debug, Default)]
pub struct ShapedText {
    /// Measurement box.
    pub bounds: TextBounds,
    /// Filled glyph outlines (nonzero winding).
    pub outline: BezPath,
}

impl ShapedText {
    /// Return `true` when the text has no visible geometry.
    pub fn is_blank(&self) -> bool {
        self.outline.elements().is_empty()
    }
}

/// Text measurement collaborator used by the rasterizer.
pub trait TextShaper {
    /// Shape `text` with `style` under `direction`.
    ///
    /// Failures (missing fonts, unsupported glyphs) are reported as
    /// [`RingsError::Measurement`](crate::RingsError::Measurement).
    fn shape(
        &mut self,
        text: &str,
        style: &TextStyle,
        direction: WritingDirection,
    ) -> RingsResult<ShapedText>;
}
