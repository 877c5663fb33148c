use kurbo::{Circle, Line, Shape};

use crate::foundation::core::{Affine, Rgba8, Vec2};
use crate::foundation::error::RingsResult;
use crate::ring::component::{RingTextOpts, TextComponent};
use crate::surface::cpu::CpuSurface;
use crate::surface::image::RasterImage;
use crate::surface::DrawSurface;
use crate::text::shaper::{TextBounds, TextShaper};

const BLUEPRINT_BOX: Rgba8 = Rgba8::new(255, 0, 255, 160);
const BLUEPRINT_BASELINE: Rgba8 = Rgba8::new(0, 200, 255, 200);
const BLUEPRINT_MARKER: Rgba8 = Rgba8::new(255, 64, 0, 255);
const BLUEPRINT_MARKER_RADIUS: f64 = 2.0;
const BLUEPRINT_TOLERANCE: f64 = 0.1;

/// Angle between neighbouring components, or `None` when there are none.
pub fn angular_step(count: usize) -> Option<f64> {
    (count > 0).then(|| 360.0 / count as f64)
}

/// Ring rotation of component `index` out of `count`, in degrees.
pub fn ring_degrees(index: usize, count: usize) -> f64 {
    angular_step(count).map_or(0.0, |step| step * index as f64)
}

/// Draw `components` around the ring described by `opts` onto `surface`.
///
/// Components are painted in order, so later ones cover earlier ones. Shaping errors abort the
/// whole call.
pub fn draw_ring_text<S, T>(
    surface: &mut S,
    shaper: &mut T,
    components: &[TextComponent],
    opts: &RingTextOpts,
) -> RingsResult<()>
where
    S: DrawSurface,
    T: TextShaper + ?Sized,
{
    let Some(step) = angular_step(components.len()) else {
        return Ok(());
    };
    let rect = opts.drawing_rect;
    let pivot = rect.center();

    for (i, component) in components.iter().enumerate() {
        let style = component.style.with_font_size(opts.font_size);
        let shaped = shaper.shape(&component.text, &style, opts.direction)?;
        let bound = shaped.bounds;
        let offset = Vec2::new(pivot.x - bound.width / 2.0, rect.y0);
        let degrees = step * i as f64;
        tracing::trace!(index = i, degrees, width = bound.width, "placing ring component");

        surface.rotate(degrees, pivot, |surface| {
            if opts.show_blueprint {
                draw_blueprint(surface, bound, offset)?;
            }
            if shaped.is_blank() {
                return Ok(());
            }

            let local_box = bound.rect() + offset;
            surface.rotate(opts.text_degrees, local_box.center(), |surface| {
                let mut path = shaped.outline.clone();
                path.apply_affine(Affine::translate(offset));
                if opts.outline_width > 0.0 {
                    let color = opts.outline_color.unwrap_or(component.color);
                    surface.stroke_path(&path, color, opts.outline_width)?;
                }
                surface.fill_path(&path, component.color, opts.shadow.as_ref())
            })
        })?;
    }
    Ok(())
}

/// Measurement box, baseline and placement marker of one component.
fn draw_blueprint<S: DrawSurface>(surface: &mut S, bound: TextBounds, offset: Vec2) -> RingsResult<()> {
    let local_box = bound.rect() + offset;
    surface.stroke_path(&local_box.to_path(BLUEPRINT_TOLERANCE), BLUEPRINT_BOX, 1.0)?;

    let y = local_box.y0 + bound.baseline;
    let baseline = Line::new((local_box.x0, y), (local_box.x1, y));
    surface.stroke_path(&baseline.to_path(BLUEPRINT_TOLERANCE), BLUEPRINT_BASELINE, 1.0)?;

    let marker = Circle::new(offset.to_point(), BLUEPRINT_MARKER_RADIUS);
    surface.fill_path(&marker.to_path(BLUEPRINT_TOLERANCE), BLUEPRINT_MARKER, None)
}

/// Rasterize `components` into a new image of `opts.canvas_size`.
///
/// An empty canvas yields [`RasterImage::empty`]; an empty component list yields a transparent
/// image of the requested size.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(
        components = components.len(),
        width = opts.canvas_size.width,
        height = opts.canvas_size.height
    )
)]
pub fn rasterize<T>(
    components: &[TextComponent],
    opts: &RingTextOpts,
    shaper: &mut T,
) -> RingsResult<RasterImage>
where
    T: TextShaper + ?Sized,
{
    let (w, h) = opts.canvas_size.pixel_dims();
    if opts.canvas_size.is_empty() || w == 0 || h == 0 {
        tracing::debug!("degenerate canvas, skipping rasterization");
        return Ok(RasterImage::empty());
    }
    if components.is_empty() {
        return Ok(RasterImage::transparent(w, h));
    }

    let mut surface = CpuSurface::new(w, h)?;
    draw_ring_text(&mut surface, shaper, components, opts)?;
    surface.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/ring/raster.rs"]
mod tests;
