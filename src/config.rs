use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::foundation::core::Rgba8;
use crate::foundation::error::{RingsError, RingsResult};
use crate::ring::component::TextComponent;
use crate::surface::blend::BlendMode;
use crate::surface::{Brush, Shadow};
use crate::text::style::{FontBytes, TextStyle, WritingDirection};
use crate::view::ring_view::{RingTextView, components_from_delimited};

/// One explicitly listed ring component.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentDef {
    /// Text to draw.
    pub text: String,
    /// Fill color (`#RRGGBB` or `#RRGGBBAA`).
    pub color: Rgba8,
}

/// Components given as one string split on a separator.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DelimitedDef {
    /// Full text.
    pub text: String,
    /// Separator between components.
    pub separator: String,
    /// Color shared by every component.
    pub color: Rgba8,
}

/// JSON description of one ring view.
///
/// Exactly one of `components` and `delimited` must be given. Font paths are relative to the
/// directory holding the config file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RingConfig {
    /// Logical ring name, used in cache keys.
    pub name: String,
    /// Font file (TTF/OTF) relative to the config directory.
    #[serde(default)]
    pub font: Option<String>,
    /// Font weight applied to every component.
    #[serde(default)]
    pub font_weight: Option<f32>,
    /// Letter spacing in pixels.
    #[serde(default)]
    pub letter_spacing: Option<f32>,
    /// Explicit components.
    #[serde(default)]
    pub components: Vec<ComponentDef>,
    /// Components split from one string.
    #[serde(default)]
    pub delimited: Option<DelimitedDef>,
    /// Font size as a fraction of half the inscribed square.
    #[serde(default = "default_font_ratio")]
    pub font_ratio: f64,
    /// Per-component rotation in degrees.
    #[serde(default)]
    pub text_degrees: f64,
    /// Inset of the drawing square (0..=1).
    #[serde(default)]
    pub inset_ratio: f64,
    /// Outline width; `0` disables outlines.
    #[serde(default)]
    pub outline_width: f64,
    /// Outline color.
    #[serde(default)]
    pub outline_color: Option<Rgba8>,
    /// Component shadow.
    #[serde(default)]
    pub shadow: Option<Shadow>,
    /// Background brush.
    #[serde(default)]
    pub brush: Option<Brush>,
    /// How the text image is composited over the background.
    #[serde(default = "default_blend_mode")]
    pub blend_mode: BlendMode,
    /// Base writing direction.
    #[serde(default)]
    pub direction: WritingDirection,
    /// Draw measurement and layout guides.
    #[serde(default)]
    pub blueprint: bool,
}

fn default_font_ratio() -> f64 {
    0.2
}

fn default_blend_mode() -> BlendMode {
    BlendMode::Src
}

impl RingConfig {
    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> RingsResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| RingsError::config(format!("parse ring config JSON: {e}")))
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> RingsResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            RingsError::config(format!("open ring config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check ranges and mutually exclusive fields.
    pub fn validate(&self) -> RingsResult<()> {
        if self.name.trim().is_empty() {
            return Err(RingsError::config("ring name must be non-empty"));
        }
        match (self.components.is_empty(), &self.delimited) {
            (false, Some(_)) => {
                return Err(RingsError::config(
                    "give either 'components' or 'delimited', not both",
                ));
            }
            (true, None) => {
                return Err(RingsError::config(
                    "ring needs 'components' or 'delimited' text",
                ));
            }
            _ => {}
        }
        if !self.font_ratio.is_finite() || self.font_ratio <= 0.0 {
            return Err(RingsError::config("font_ratio must be finite and > 0"));
        }
        if !(0.0..=1.0).contains(&self.inset_ratio) {
            return Err(RingsError::config("inset_ratio must be in [0, 1]"));
        }
        if !self.text_degrees.is_finite() {
            return Err(RingsError::config("text_degrees must be finite"));
        }
        if !self.outline_width.is_finite() || self.outline_width < 0.0 {
            return Err(RingsError::config("outline_width must be finite and >= 0"));
        }
        if let Some(shadow) = &self.shadow
            && (!shadow.blur_radius.is_finite() || shadow.blur_radius < 0.0)
        {
            return Err(RingsError::config("shadow blur_radius must be finite and >= 0"));
        }
        if let Some(font) = &self.font {
            normalize_rel_path(font)?;
        }
        Ok(())
    }

    /// Absolute location of the font file, if any.
    pub fn font_path(&self, base_dir: &Path) -> RingsResult<Option<PathBuf>> {
        self.font
            .as_deref()
            .map(|f| normalize_rel_path(f).map(|rel| base_dir.join(rel)))
            .transpose()
    }

    /// Text style shared by every component, loading the font from `base_dir`.
    pub fn text_style(&self, base_dir: &Path) -> RingsResult<TextStyle> {
        let mut style = TextStyle::new();
        if let Some(path) = self.font_path(base_dir)? {
            let bytes = std::fs::read(&path).map_err(|e| {
                RingsError::config(format!("read font '{}': {e}", path.display()))
            })?;
            style = style.with_font(FontBytes::new(bytes));
        }
        if let Some(weight) = self.font_weight {
            style = style.with_font_weight(weight);
        }
        if let Some(spacing) = self.letter_spacing {
            style = style.with_letter_spacing(spacing);
        }
        Ok(style)
    }

    /// Validate and build the described view.
    pub fn into_view(self, base_dir: &Path) -> RingsResult<RingTextView> {
        self.validate()?;
        let style = self.text_style(base_dir)?;
        let components = match &self.delimited {
            Some(d) => components_from_delimited(&d.text, &d.separator, d.color, &style),
            None => self
                .components
                .iter()
                .map(|c| TextComponent::new(c.text.clone(), c.color).with_style(style.clone()))
                .collect(),
        };

        Ok(RingTextView::new(self.name, components)
            .with_font_ratio(self.font_ratio)
            .with_text_degrees(self.text_degrees)
            .with_inset_ratio(self.inset_ratio)
            .with_shadow(self.shadow)
            .with_outline(self.outline_width, self.outline_color)
            .with_brush(self.brush)
            .with_blend_mode(self.blend_mode)
            .with_direction(self.direction)
            .with_blueprint(self.blueprint))
    }
}

/// Normalize a config-relative path: forward slashes, no `.` segments, no absolute paths and
/// no `..`.
pub(crate) fn normalize_rel_path(source: &str) -> RingsResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') || s.get(1..2) == Some(":") {
        return Err(RingsError::config("font paths must be relative"));
    }
    let parts = s
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .map(|part| {
            if part == ".." {
                Err(RingsError::config("font paths must not contain '..'"))
            } else {
                Ok(part)
            }
        })
        .collect::<RingsResult<Vec<_>>>()?;
    if parts.is_empty() {
        return Err(RingsError::config("font path must contain a file name"));
    }
    Ok(parts.join("/"))
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
