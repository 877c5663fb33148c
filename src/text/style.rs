use std::sync::Arc;

use crate::foundation::math::fnv1a64;

/// Shared, immutable font file bytes (TTF/OTF).
///
/// The content fingerprint is computed once on construction.
#[derive(Clone)]
pub struct FontBytes {
    bytes: Arc<Vec<u8>>,
    fingerprint: u64,
}

impl FontBytes {
    /// Wrap raw font file bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        let fingerprint = fnv1a64(&bytes);
        Self {
            bytes: Arc::new(bytes),
            fingerprint,
        }
    }

    /// Raw font file bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    /// Content fingerprint, stable for identical bytes.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }
}

impl PartialEq for FontBytes {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
            && (Arc::ptr_eq(&self.bytes, &other.bytes) || self.bytes == other.bytes)
    }
}

impl Eq for FontBytes {}

impl std::fmt::Debug for FontBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBytes")
            .field("len", &self.bytes.len())
            .field("fingerprint", &format_args!("{:016x}", self.fingerprint))
            .finish()
    }
}

impl From<Vec<u8>> for FontBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

/// Writing direction requested for a text component.
///
/// Glyph order is always resolved by bidi analysis of the text itself. A single unwrapped line
/// has no slack to align into, so the direction does not change the shaped outline or bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WritingDirection {
    /// Left to right.
    #[default]
    Ltr,
    /// Right to left.
    Rtl,
}

/// Shaping parameters for one text component.
///
/// The rasterizer only ever overrides `font_size`; everything else is passed through to the
/// [`TextShaper`](crate::TextShaper).
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font to shape with. `None` uses the shaper's default font.
    pub font: Option<FontBytes>,
    /// Font size in pixels.
    pub font_size: f32,
    /// Font weight (100..=900, 400 is regular).
    pub font_weight: f32,
    /// Extra spacing between letters in pixels.
    pub letter_spacing: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: None,
            font_size: 16.0,
            font_weight: 400.0,
            letter_spacing: 0.0,
        }
    }
}

impl TextStyle {
    /// Default style (shaper default font, 16px, regular weight).
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of this style with a different font size.
    pub fn with_font_size(&self, font_size: f32) -> Self {
        Self {
            font_size,
            ..self.clone()
        }
    }

    /// Return a style that shapes with `font`.
    pub fn with_font(mut self, font: FontBytes) -> Self {
        self.font = Some(font);
        self
    }

    /// Return a style with the given weight.
    pub fn with_font_weight(mut self, weight: f32) -> Self {
        self.font_weight = weight;
        self
    }

    /// Return a style with the given letter spacing.
    pub fn with_letter_spacing(mut self, spacing: f32) -> Self {
        self.letter_spacing = spacing;
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/style.rs"]
mod tests;
