use std::sync::Arc;

use kurbo::Shape;

use crate::foundation::core::{Affine, BezPath, Point, Rect, Rgba8, Size};
use crate::foundation::error::{RingsError, RingsResult};
use crate::foundation::math::blur_radius_to_sigma;
use crate::surface::blend::{BlendMode, blend_rgba8_premul, premul_over_in_place};
use crate::surface::blur::{BlurKernel, blur_premul_in_place};
use crate::surface::image::RasterImage;
use crate::surface::{Brush, DrawSurface, Shadow};

/// [`DrawSurface`] rasterizing with `vello_cpu` into a premultiplied RGBA8 buffer.
///
/// Vector drawing is batched in a render context and flushed into the base buffer whenever a
/// pixel-level operation (blurred shadow, image composite) needs the current contents.
pub struct CpuSurface {
    width: u16,
    height: u16,
    base: Vec<u8>,
    ctx: Option<vello_cpu::RenderContext>,
    transform: Affine,
    blur_scratch: Vec<u8>,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pending", &self.ctx.is_some())
            .field("transform", &self.transform)
            .finish_non_exhaustive()
    }
}

impl CpuSurface {
    /// Transparent surface of `width x height` pixels.
    pub fn new(width: u32, height: u32) -> RingsResult<Self> {
        if width == 0 || height == 0 {
            return Err(RingsError::validation("surface width/height must be > 0"));
        }
        let w: u16 = width
            .try_into()
            .map_err(|_| RingsError::validation("surface width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| RingsError::validation("surface height exceeds u16"))?;
        Ok(Self {
            width: w,
            height: h,
            base: vec![0u8; usize::from(w) * usize::from(h) * 4],
            ctx: None,
            transform: Affine::IDENTITY,
            blur_scratch: Vec::new(),
        })
    }

    /// Transparent surface covering `size`, truncated to whole pixels.
    pub fn for_size(size: Size) -> RingsResult<Self> {
        let (w, h) = size.pixel_dims();
        Self::new(w, h)
    }

    /// Flush pending drawing and return the finished image.
    pub fn finish(mut self) -> RingsResult<RasterImage> {
        self.flush_pending()?;
        RasterImage::from_premul_rgba8(
            u32::from(self.width),
            u32::from(self.height),
            std::mem::take(&mut self.base),
        )
    }

    fn pending_ctx(&mut self) -> &mut vello_cpu::RenderContext {
        let (w, h) = (self.width, self.height);
        self.ctx
            .get_or_insert_with(|| vello_cpu::RenderContext::new(w, h))
    }

    /// Render batched vector drawing into a fresh layer.
    fn take_layer(&mut self) -> Option<Vec<u8>> {
        let mut ctx = self.ctx.take()?;
        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.render_to_pixmap(&mut pixmap);
        Some(pixmap.data_as_u8_slice().to_vec())
    }

    fn flush_pending(&mut self) -> RingsResult<()> {
        if let Some(layer) = self.take_layer() {
            premul_over_in_place(&mut self.base, &layer)?;
        }
        Ok(())
    }

    fn shadow_transform(&self, shadow: &Shadow) -> Affine {
        Affine::translate(shadow.offset) * self.transform
    }

    /// Render, blur and composite a shadow inside the device rectangle it can reach.
    fn draw_blurred_shadow(&mut self, path: &BezPath, shadow: &Shadow) -> RingsResult<()> {
        let kernel = BlurKernel::for_sigma(blur_radius_to_sigma(shadow.blur_radius))?;
        let tr = self.shadow_transform(shadow);
        let Some(region) = ShadowRegion::new(
            tr.transform_rect_bbox(path.bounding_box()),
            kernel.radius(),
            self.width,
            self.height,
        ) else {
            return Ok(());
        };
        self.flush_pending()?;

        let mut ctx = vello_cpu::RenderContext::new(region.width, region.height);
        let local = Affine::translate((-f64::from(region.x0), -f64::from(region.y0))) * tr;
        ctx.set_transform(affine_to_cpu(local));
        ctx.set_paint(color_to_cpu(shadow.color));
        ctx.fill_path(&bezpath_to_cpu(path));
        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(region.width, region.height);
        ctx.render_to_pixmap(&mut pixmap);
        let mut layer = pixmap.data_as_u8_slice().to_vec();

        blur_premul_in_place(
            &mut layer,
            usize::from(region.width),
            usize::from(region.height),
            &kernel,
            &mut self.blur_scratch,
        )?;
        region.composite_into(
            &mut self.base,
            usize::from(self.width),
            usize::from(self.height),
            &layer,
        )
    }

    fn gradient_paint(&self, rect: Rect, brush: &Brush) -> RingsResult<vello_cpu::Image> {
        let w = rect.width().abs().ceil().max(1.0) as u32;
        let h = rect.height().abs().ceil().max(1.0) as u32;
        let (x0, y0) = (rect.min_x(), rect.min_y());
        let mut bytes = vec![0u8; (w as usize).saturating_mul(h as usize).saturating_mul(4)];
        for y in 0..h {
            for x in 0..w {
                let p = Point::new(x0 + f64::from(x) + 0.5, y0 + f64::from(y) + 0.5);
                let c = brush.color_at(p).premultiplied().to_array();
                let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
                bytes[idx..idx + 4].copy_from_slice(&c);
            }
        }
        rgba_premul_to_image(&bytes, w, h)
    }
}

impl DrawSurface for CpuSurface {
    fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    fn transform(&self) -> Affine {
        self.transform
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn fill_rect(&mut self, rect: Rect, brush: &Brush) -> RingsResult<()> {
        let tr = self.transform;
        let cpu_rect = vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1);
        if let Some(color) = brush.as_solid() {
            let ctx = self.pending_ctx();
            ctx.set_transform(affine_to_cpu(tr));
            ctx.set_paint(color_to_cpu(color));
            ctx.fill_rect(&cpu_rect);
            return Ok(());
        }

        // Gradients are baked into an image covering the rect, anchored at its top-left corner.
        let img = self.gradient_paint(rect, brush)?;
        let paint_tr = Affine::translate((rect.min_x(), rect.min_y()));
        let ctx = self.pending_ctx();
        ctx.set_transform(affine_to_cpu(tr));
        ctx.set_paint(img);
        ctx.set_paint_transform(affine_to_cpu(paint_tr));
        ctx.fill_rect(&cpu_rect);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(())
    }

    fn fill_path(
        &mut self,
        path: &BezPath,
        color: Rgba8,
        shadow: Option<&Shadow>,
    ) -> RingsResult<()> {
        let cpu_path = bezpath_to_cpu(path);
        if let Some(shadow) = shadow {
            if shadow.blur_radius > 0.0 {
                self.draw_blurred_shadow(path, shadow)?;
            } else {
                let tr = self.shadow_transform(shadow);
                let ctx = self.pending_ctx();
                ctx.set_transform(affine_to_cpu(tr));
                ctx.set_paint(color_to_cpu(shadow.color));
                ctx.fill_path(&cpu_path);
            }
        }

        let tr = self.transform;
        let ctx = self.pending_ctx();
        ctx.set_transform(affine_to_cpu(tr));
        ctx.set_paint(color_to_cpu(color));
        ctx.fill_path(&cpu_path);
        Ok(())
    }

    fn stroke_path(&mut self, path: &BezPath, color: Rgba8, width: f64) -> RingsResult<()> {
        if !width.is_finite() || width <= 0.0 {
            return Err(RingsError::validation("stroke width must be finite and > 0"));
        }
        let tr = self.transform;
        let ctx = self.pending_ctx();
        ctx.set_transform(affine_to_cpu(tr));
        ctx.set_paint(color_to_cpu(color));
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        ctx.stroke_path(&bezpath_to_cpu(path));
        Ok(())
    }

    fn draw_image(&mut self, image: &RasterImage, blend: BlendMode) -> RingsResult<()> {
        self.flush_pending()?;
        if image.is_empty() {
            return Ok(());
        }

        let dst_w = usize::from(self.width);
        let src_w = image.width() as usize;
        let cols = dst_w.min(src_w);
        let rows = usize::from(self.height).min(image.height() as usize);
        let src = image.data();
        for y in 0..rows {
            let d = y * dst_w * 4;
            let s = y * src_w * 4;
            blend_rgba8_premul(
                &mut self.base[d..d + cols * 4],
                &src[s..s + cols * 4],
                blend,
            )?;
        }
        Ok(())
    }
}

/// Pixel rectangle covering a shadow plus its blur spread, limited to the canvas grown by the
/// same spread. May start at negative coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ShadowRegion {
    x0: i32,
    y0: i32,
    width: u16,
    height: u16,
}

impl ShadowRegion {
    fn new(device_bbox: Rect, spread: usize, canvas_w: u16, canvas_h: u16) -> Option<Self> {
        let pad = spread as f64 + 1.0;
        let limit = Rect::new(
            -pad,
            -pad,
            f64::from(canvas_w) + pad,
            f64::from(canvas_h) + pad,
        );
        let r = device_bbox.inflate(pad, pad).intersect(limit);
        if !(r.width() > 0.0 && r.height() > 0.0) {
            return None;
        }
        let (x0, y0) = (r.x0.floor(), r.y0.floor());
        let width = u16::try_from((r.x1.ceil() - x0) as i64).ok()?;
        let height = u16::try_from((r.y1.ceil() - y0) as i64).ok()?;
        (width > 0 && height > 0).then_some(Self {
            x0: x0 as i32,
            y0: y0 as i32,
            width,
            height,
        })
    }

    /// Source-over `layer` (this region's pixels) onto the canvas rows it overlaps.
    fn composite_into(
        &self,
        base: &mut [u8],
        canvas_w: usize,
        canvas_h: usize,
        layer: &[u8],
    ) -> RingsResult<()> {
        let w = usize::from(self.width);
        let skip_x = (-self.x0).max(0) as usize;
        let skip_y = (-self.y0).max(0) as usize;
        let dst_x = self.x0.max(0) as usize;
        let dst_y = self.y0.max(0) as usize;
        if dst_x >= canvas_w || dst_y >= canvas_h || skip_x >= w {
            return Ok(());
        }
        let cols = (w - skip_x).min(canvas_w - dst_x);
        let rows = usize::from(self.height)
            .saturating_sub(skip_y)
            .min(canvas_h - dst_y);
        for row in 0..rows {
            let s = ((skip_y + row) * w + skip_x) * 4;
            let d = ((dst_y + row) * canvas_w + dst_x) * 4;
            premul_over_in_place(&mut base[d..d + cols * 4], &layer[s..s + cols * 4])?;
        }
        Ok(())
    }
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn rgba_premul_to_image(bytes: &[u8], width: u32, height: u32) -> RingsResult<vello_cpu::Image> {
    let w: u16 = width
        .try_into()
        .map_err(|_| RingsError::render("paint width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| RingsError::render("paint height exceeds u16"))?;
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/surface/cpu.rs"]
mod tests;
