//! Test doubles shared by the unit tests: a font-free shaper and a recording surface.

use crate::foundation::core::{Affine, BezPath, Rect, Rgba8, Size};
use crate::foundation::error::{RingsError, RingsResult};
use crate::surface::blend::BlendMode;
use crate::surface::image::RasterImage;
use crate::surface::{Brush, DrawSurface, Shadow};
use crate::text::shaper::{ShapedText, TextBounds, TextShaper};
use crate::text::style::{TextStyle, WritingDirection};

/// Shapes every non-whitespace char as a solid cell. Advance is `0.6 * size`, line height
/// `1.2 * size`, baseline at `size`.
#[derive(Debug, Default)]
pub(crate) struct BlockShaper {
    pub(crate) calls: Vec<(String, f32, WritingDirection)>,
    pub(crate) reject: Option<char>,
}

impl BlockShaper {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn rejecting(c: char) -> Self {
        Self {
            reject: Some(c),
            ..Self::default()
        }
    }
}

impl TextShaper for BlockShaper {
    fn shape(
        &mut self,
        text: &str,
        style: &TextStyle,
        direction: WritingDirection,
    ) -> RingsResult<ShapedText> {
        self.calls
            .push((text.to_owned(), style.font_size, direction));
        if let Some(c) = self.reject.filter(|c| text.contains(*c)) {
            return Err(RingsError::measurement(format!("unsupported glyph {c:?}")));
        }

        let size = f64::from(style.font_size);
        let advance = size * 0.6;
        let mut outline = BezPath::new();
        let mut chars = 0usize;
        for (i, c) in text.chars().enumerate() {
            chars += 1;
            if c.is_whitespace() {
                continue;
            }
            let x0 = i as f64 * advance;
            let cell = Rect::new(x0 + advance * 0.1, size * 0.2, x0 + advance * 0.9, size);
            outline.move_to((cell.x0, cell.y0));
            outline.line_to((cell.x1, cell.y0));
            outline.line_to((cell.x1, cell.y1));
            outline.line_to((cell.x0, cell.y1));
            outline.close_path();
        }
        Ok(ShapedText {
            bounds: TextBounds {
                width: chars as f64 * advance,
                height: size * 1.2,
                baseline: size,
            },
            outline,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    FillRect {
        rect: Rect,
        brush: Brush,
        transform: Affine,
    },
    FillPath {
        bbox: Rect,
        color: Rgba8,
        shadow: Option<Shadow>,
        transform: Affine,
    },
    StrokePath {
        color: Rgba8,
        width: f64,
        transform: Affine,
    },
    DrawImage {
        width: u32,
        height: u32,
        blend: BlendMode,
    },
}

/// Records every drawing call together with the transform active at the time.
#[derive(Debug)]
pub(crate) struct SpySurface {
    size: Size,
    transform: Affine,
    pub(crate) calls: Vec<Call>,
}

impl SpySurface {
    pub(crate) fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
            transform: Affine::IDENTITY,
            calls: Vec::new(),
        }
    }

    pub(crate) fn strokes(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::StrokePath { .. }))
            .count()
    }

    pub(crate) fn fills(&self) -> Vec<(Rect, Rgba8, Affine)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::FillPath {
                    bbox,
                    color,
                    transform,
                    ..
                } => Some((*bbox, *color, *transform)),
                _ => None,
            })
            .collect()
    }
}

impl DrawSurface for SpySurface {
    fn size(&self) -> Size {
        self.size
    }

    fn transform(&self) -> Affine {
        self.transform
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn fill_rect(&mut self, rect: Rect, brush: &Brush) -> RingsResult<()> {
        self.calls.push(Call::FillRect {
            rect,
            brush: brush.clone(),
            transform: self.transform,
        });
        Ok(())
    }

    fn fill_path(
        &mut self,
        path: &BezPath,
        color: Rgba8,
        shadow: Option<&Shadow>,
    ) -> RingsResult<()> {
        use kurbo::Shape;
        self.calls.push(Call::FillPath {
            bbox: path.bounding_box(),
            color,
            shadow: shadow.copied(),
            transform: self.transform,
        });
        Ok(())
    }

    fn stroke_path(&mut self, _path: &BezPath, color: Rgba8, width: f64) -> RingsResult<()> {
        self.calls.push(Call::StrokePath {
            color,
            width,
            transform: self.transform,
        });
        Ok(())
    }

    fn draw_image(&mut self, image: &RasterImage, blend: BlendMode) -> RingsResult<()> {
        self.calls.push(Call::DrawImage {
            width: image.width(),
            height: image.height(),
            blend,
        });
        Ok(())
    }
}

pub(crate) fn assert_affine_close(a: Affine, b: Affine) {
    for (x, y) in a.as_coeffs().iter().zip(b.as_coeffs()) {
        assert!((x - y).abs() < 1e-9, "{a:?} != {b:?}");
    }
}
