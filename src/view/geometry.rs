use crate::foundation::core::{Point, Rect, Size};

/// Layout of a ring inside a view of a given size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingGeometry {
    /// Center of the view.
    pub center: Point,
    /// Square the text hangs from, pulled in by the inset ratio.
    pub drawing_rect: Rect,
    /// Font size: half the largest inscribed square times the font ratio.
    pub font_size: f32,
}

impl RingGeometry {
    /// Compute the ring layout for `size`.
    pub fn for_size(size: Size, inset_ratio: f64, font_ratio: f64) -> Self {
        let center = size.center();
        let drawing_rect = size.fit_square(center, inset_ratio);
        let font_size = size.fit_square(center, 0.0).height() / 2.0 * font_ratio;
        Self {
            center,
            drawing_rect,
            font_size: font_size as f32,
        }
    }

    /// Largest square centered in the view, ignoring the inset.
    pub fn bounds_square(size: Size) -> Rect {
        size.fit_square(size.center(), 0.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/view/geometry.rs"]
mod tests;
