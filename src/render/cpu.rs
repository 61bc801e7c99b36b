use std::sync::Arc;

use crate::foundation::core::{Affine, Point, Rect};
use crate::foundation::error::{ReelError, ReelResult};

/// Reusable `vello_cpu` context and target pixmap of one fixed size.
pub(crate) struct CpuCanvas {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
}

impl CpuCanvas {
    pub(crate) fn new(width: u32, height: u32) -> ReelResult<Self> {
        let (w, h) = dims_u16(width, height)?;
        Ok(Self {
            width: w,
            height: h,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    /// Start a new frame of draw calls.
    pub(crate) fn begin(&mut self) -> &mut vello_cpu::RenderContext {
        self.ctx.reset();
        &mut self.ctx
    }

    /// Rasterize everything drawn since [`CpuCanvas::begin`] onto a transparent pixmap.
    pub(crate) fn finish(&mut self) -> &[u8] {
        self.ctx.flush();
        self.pixmap.data_as_u8_slice_mut().fill(0);
        self.ctx.render_to_pixmap(&mut self.pixmap);
        self.pixmap.data_as_u8_slice()
    }

    pub(crate) fn width(&self) -> u32 {
        u32::from(self.width)
    }

    pub(crate) fn height(&self) -> u32 {
        u32::from(self.height)
    }
}

pub(crate) fn dims_u16(width: u32, height: u32) -> ReelResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ReelError::evaluation("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ReelError::evaluation("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(ReelError::evaluation("surface dimensions must be non-zero"));
    }
    Ok((w, h))
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

pub(crate) fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

/// Straight RGBA8 into a solid paint color.
pub(crate) fn color(rgba: [u8; 4]) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3])
}

pub(crate) fn pixmap_from_premul(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> ReelResult<vello_cpu::Pixmap> {
    let (w, h) = dims_u16(width, height)?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(ReelError::evaluation("premultiplied image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

/// Image paint over premultiplied bytes.
pub(crate) fn image_paint(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> ReelResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul(rgba8_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// Fill `[0, width) x [0, height)` in the current transform with `paint`, at `opacity`.
pub(crate) fn draw_image(
    ctx: &mut vello_cpu::RenderContext,
    paint: vello_cpu::Image,
    width: f64,
    height: f64,
    transform: Affine,
    opacity: f32,
) {
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(paint);
    if opacity < 1.0 {
        ctx.push_opacity_layer(opacity);
    }
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, width, height));
    if opacity < 1.0 {
        ctx.pop_layer();
    }
}
