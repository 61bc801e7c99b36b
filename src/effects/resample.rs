use rayon::prelude::*;

use crate::effects::raster::Raster;
use crate::foundation::core::Rect;
use crate::foundation::error::ReelResult;

/// How a source image maps onto the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fit {
    /// Scale to cover the canvas, cropping the overflow around the center.
    #[default]
    Cover,
    /// Scale to fit inside the canvas, leaving transparent bars.
    Contain,
}

/// Resample a premultiplied `src_w x src_h` image onto a `width x height` raster.
pub fn fit_to(
    src: &[u8],
    src_w: u32,
    src_h: u32,
    width: u32,
    height: u32,
    fit: Fit,
) -> ReelResult<Raster> {
    let mut out = Raster::transparent(width, height)?;
    fit_into(src, src_w, src_h, fit, &mut out)?;
    Ok(out)
}

/// Like [`fit_to`], writing into `dst` at its own extent.
pub(crate) fn fit_into(
    src: &[u8],
    src_w: u32,
    src_h: u32,
    fit: Fit,
    dst: &mut Raster,
) -> ReelResult<()> {
    let (width, height) = (dst.width, dst.height);
    if src_w == 0 || src_h == 0 {
        dst.data.fill(0);
        return Ok(());
    }
    let sx = f64::from(width) / f64::from(src_w);
    let sy = f64::from(height) / f64::from(src_h);
    match fit {
        Fit::Cover => {
            let s = sx.max(sy);
            let ww = f64::from(width) / s;
            let wh = f64::from(height) / s;
            let x0 = (f64::from(src_w) - ww) / 2.0;
            let y0 = (f64::from(src_h) - wh) / 2.0;
            let window = Rect::new(x0, y0, x0 + ww, y0 + wh);
            sample_window_into(src, src_w, src_h, window, width, height, &mut dst.data);
        }
        Fit::Contain => {
            let s = sx.min(sy);
            let dw = ((f64::from(src_w) * s).round() as u32).clamp(1, width);
            let dh = ((f64::from(src_h) * s).round() as u32).clamp(1, height);
            let full = Rect::new(0.0, 0.0, f64::from(src_w), f64::from(src_h));
            let mut inner = Raster::from_premul(dw, dh, sample_window(src, src_w, src_h, full, dw, dh))?;
            inner.origin = (((width - dw) / 2) as i32, ((height - dh) / 2) as i32);
            dst.data.copy_from_slice(&inner.clamp_to(width, height)?.data);
        }
    }
    Ok(())
}

/// Horizontal pan direction for the Ken Burns move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanDirection {
    /// Toward +x.
    Right,
    /// Toward -x.
    Left,
}

impl PanDirection {
    /// Even item indices pan right, odd ones left.
    pub fn for_index(index: usize) -> Self {
        if index.is_multiple_of(2) {
            Self::Right
        } else {
            Self::Left
        }
    }

    fn sign(self) -> f64 {
        match self {
            Self::Right => 1.0,
            Self::Left => -1.0,
        }
    }
}

/// Source window for a zoom of `scale` (>= 1) at pan `progress` over a `width x height` raster.
///
/// The window always lies inside the raster.
pub fn pan_zoom_window(width: u32, height: u32, scale: f64, direction: PanDirection, progress: f64) -> Rect {
    let scale = scale.max(1.0);
    let w = f64::from(width);
    let h = f64::from(height);
    let ww = w / scale;
    let wh = h / scale;
    let slack_x = w - ww;
    let p = progress.clamp(0.0, 1.0);
    let x0 = slack_x * (0.5 + 0.5 * direction.sign() * p);
    let y0 = (h - wh) / 2.0;
    Rect::new(x0, y0, x0 + ww, y0 + wh)
}

/// Zoom and pan `src` in place of its own extent.
pub fn pan_zoom(src: &Raster, scale: f64, direction: PanDirection, progress: f64) -> ReelResult<Raster> {
    let mut out = Raster::transparent(src.width, src.height)?;
    out.origin = src.origin;
    pan_zoom_into(src, &mut out.data, scale, direction, progress);
    Ok(out)
}

/// Like [`pan_zoom`], writing the pixels into `dst`, which must hold `src`'s byte length.
pub(crate) fn pan_zoom_into(
    src: &Raster,
    dst: &mut [u8],
    scale: f64,
    direction: PanDirection,
    progress: f64,
) {
    let window = pan_zoom_window(src.width, src.height, scale, direction, progress);
    sample_window_into(&src.data, src.width, src.height, window, src.width, src.height, dst);
}

/// Bilinear resample of `window` (source pixel coordinates) into an `out_w x out_h` buffer.
pub(crate) fn sample_window(
    src: &[u8],
    src_w: u32,
    src_h: u32,
    window: Rect,
    out_w: u32,
    out_h: u32,
) -> Vec<u8> {
    let mut out = vec![0u8; out_w as usize * out_h as usize * 4];
    sample_window_into(src, src_w, src_h, window, out_w, out_h, &mut out);
    out
}

fn sample_window_into(
    src: &[u8],
    src_w: u32,
    src_h: u32,
    window: Rect,
    out_w: u32,
    out_h: u32,
    out: &mut [u8],
) {
    if out_w == 0 || out_h == 0 {
        return;
    }
    let step_x = window.width() / f64::from(out_w);
    let step_y = window.height() / f64::from(out_h);
    let max_x = f64::from(src_w - 1);
    let max_y = f64::from(src_h - 1);
    out.par_chunks_mut(out_w as usize * 4)
        .take(out_h as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let fy = (window.y0 + (y as f64 + 0.5) * step_y - 0.5).clamp(0.0, max_y);
            let y0 = fy.floor() as usize;
            let y1 = (y0 + 1).min(src_h as usize - 1);
            let ty = fy - y0 as f64;
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let fx = (window.x0 + (x as f64 + 0.5) * step_x - 0.5).clamp(0.0, max_x);
                let x0 = fx.floor() as usize;
                let x1 = (x0 + 1).min(src_w as usize - 1);
                let tx = fx - x0 as f64;
                let at = |xx: usize, yy: usize, c: usize| f64::from(src[(yy * src_w as usize + xx) * 4 + c]);
                for c in 0..4 {
                    let top = at(x0, y0, c) * (1.0 - tx) + at(x1, y0, c) * tx;
                    let bottom = at(x0, y1, c) * (1.0 - tx) + at(x1, y1, c) * tx;
                    px[c] = (top * (1.0 - ty) + bottom * ty).round().clamp(0.0, 255.0) as u8;
                }
            }
        });
}

#[cfg(test)]
#[path = "../../tests/unit/effects/resample.rs"]
mod tests;
