use std::borrow::Cow;
use std::collections::HashMap;

use parley::layout::PositionedLayoutItem;
use skrifa::instance::{LocationRef, NormalizedCoord, Size as FontSize};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::{GlyphId, MetadataProvider};

use crate::foundation::core::{BezPath, Point};
use crate::foundation::error::{RingsError, RingsResult};
use crate::text::shaper::{ShapedText, TextBounds, TextShaper};
use crate::text::style::{FontBytes, TextStyle, WritingDirection};

/// [`TextShaper`] backed by Parley layout and Skrifa glyph outlines.
///
/// Fonts are never discovered from the system: register font bytes with
/// [`ParleyShaper::register_font`] or carry them on each [`TextStyle`].
///
/// Parley resolves the paragraph direction from the text, so [`WritingDirection`] does not change
/// the shaped geometry.
pub struct ParleyShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    families: HashMap<u64, String>,
    default_family: Option<String>,
}

impl Default for ParleyShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ParleyShaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParleyShaper")
            .field("families", &self.families.len())
            .field("default_family", &self.default_family)
            .finish_non_exhaustive()
    }
}

impl ParleyShaper {
    /// Construct a shaper with fresh Parley contexts and no fonts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
            default_family: None,
        }
    }

    /// Construct a shaper whose default font is `font`.
    pub fn with_default_font(font: &FontBytes) -> RingsResult<Self> {
        let mut out = Self::new();
        out.register_font(font)?;
        Ok(out)
    }

    /// Register font bytes and return the family name they provide.
    ///
    /// The first registered family becomes the default for styles without a font. Registering
    /// the same bytes twice is a cheap lookup.
    pub fn register_font(&mut self, font: &FontBytes) -> RingsResult<String> {
        let fingerprint = font.fingerprint();
        if let Some(name) = self.families.get(&fingerprint) {
            return Ok(name.clone());
        }

        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.as_bytes().to_vec()),
            None,
        );
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            RingsError::measurement("no font families registered from font bytes")
        })?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| RingsError::measurement("registered font family has no name"))?
            .to_string();

        tracing::debug!(family = %family_name, "registered font");
        self.families.insert(fingerprint, family_name.clone());
        if self.default_family.is_none() {
            self.default_family = Some(family_name.clone());
        }
        Ok(family_name)
    }

    /// Family used for styles that do not carry their own font.
    pub fn default_family(&self) -> Option<&str> {
        self.default_family.as_deref()
    }

    fn family_for(&mut self, style: &TextStyle) -> RingsResult<String> {
        match &style.font {
            Some(font) => self.register_font(font),
            None => self
                .default_family
                .clone()
                .ok_or_else(|| RingsError::measurement("no font registered with the shaper")),
        }
    }
}

impl TextShaper for ParleyShaper {
    fn shape(
        &mut self,
        text: &str,
        style: &TextStyle,
        _direction: WritingDirection,
    ) -> RingsResult<ShapedText> {
        let size_px = style.font_size;
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(RingsError::validation(
                "text font_size must be finite and > 0",
            ));
        }
        let family = self.family_for(style)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(style.font_weight),
        ));
        builder.push_default(parley::style::StyleProperty::LetterSpacing(
            style.letter_spacing,
        ));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        // Bidi levels come from the text; one unwrapped line has nothing to align into.
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );

        let baseline = layout
            .lines()
            .last()
            .map(|line| line.metrics().baseline)
            .unwrap_or(0.0);
        let bounds = TextBounds {
            width: f64::from(layout.width()),
            height: f64::from(layout.height()),
            baseline: f64::from(baseline),
        };

        let mut outline = BezPath::new();
        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let run = glyph_run.run();
                let font = run.font();
                let font_ref = skrifa::FontRef::from_index(font.data.as_ref(), font.index)
                    .map_err(|e| RingsError::measurement(format!("unreadable font data: {e}")))?;
                let outlines = font_ref.outline_glyphs();
                let coords = run
                    .normalized_coords()
                    .iter()
                    .map(|c| NormalizedCoord::from_bits(*c))
                    .collect::<Vec<_>>();
                let font_size = FontSize::new(run.font_size());

                for glyph in glyph_run.positioned_glyphs() {
                    let glyph_outline = outlines.get(GlyphId::from(glyph.id)).ok_or_else(|| {
                        RingsError::measurement(format!(
                            "glyph {} in {text:?} has no outline",
                            glyph.id
                        ))
                    })?;
                    let mut pen = PathPen {
                        path: &mut outline,
                        origin: Point::new(f64::from(glyph.x), f64::from(glyph.y)),
                    };
                    let settings = DrawSettings::unhinted(font_size, LocationRef::new(&coords));
                    glyph_outline.draw(settings, &mut pen).map_err(|e| {
                        RingsError::measurement(format!("failed to outline glyph {}: {e}", glyph.id))
                    })?;
                }
            }
        }

        Ok(ShapedText { bounds, outline })
    }
}

/// Skrifa pen that appends y-up font outlines to a y-down path at a glyph origin.
struct PathPen<'a> {
    path: &'a mut BezPath,
    origin: Point,
}

impl PathPen<'_> {
    fn pt(&self, x: f32, y: f32) -> Point {
        Point::new(self.origin.x + f64::from(x), self.origin.y - f64::from(y))
    }
}

impl OutlinePen for PathPen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.pt(x, y);
        self.path.move_to(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.pt(x, y);
        self.path.line_to(p);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        let c = self.pt(cx0, cy0);
        let p = self.pt(x, y);
        self.path.quad_to(c, p);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        let c0 = self.pt(cx0, cy0);
        let c1 = self.pt(cx1, cy1);
        let p = self.pt(x, y);
        self.path.curve_to(c0, c1, p);
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/parley_shaper.rs"]
mod tests;
