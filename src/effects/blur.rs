use rayon::prelude::*;

use crate::effects::raster::Raster;
use crate::foundation::error::{ReelError, ReelResult};

/// Gaussian blur with `sigma = radius / 2`.
///
/// The output grows by `radius` on every side; samples outside the input repeat its edge pixels,
/// so a full-frame photo stays opaque up to its border.
pub fn gaussian_blur(src: &Raster, radius: u32) -> ReelResult<Raster> {
    if radius == 0 {
        return Ok(src.clone());
    }
    let kernel = gaussian_kernel_q16(radius, radius as f32 / 2.0)?;
    let padded = pad_edges(src, radius)?;
    let mut tmp = vec![0u8; padded.data.len()];
    let mut out = vec![0u8; padded.data.len()];
    horizontal_blur_q16(&padded.data, &mut tmp, padded.width, &kernel);
    vertical_blur_q16(&tmp, &mut out, padded.width, padded.height, &kernel);
    Ok(Raster {
        data: out,
        ..padded
    })
}

/// Normalized Q16 weights for a `2 * radius + 1` tap kernel.
pub(crate) fn gaussian_kernel_q16(radius: u32, sigma: f32) -> ReelResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ReelError::validation("blur sigma must be finite and > 0"));
    }

    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(ReelError::evaluation("gaussian kernel sum is zero"));
    }

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    Ok(weights)
}

fn pad_edges(src: &Raster, pad: u32) -> ReelResult<Raster> {
    let w = src.width + 2 * pad;
    let h = src.height + 2 * pad;
    let mut out = Raster::transparent(w, h)?;
    out.origin = (src.origin.0 - pad as i32, src.origin.1 - pad as i32);
    if src.width == 0 || src.height == 0 {
        return Ok(out);
    }
    let sw = src.width as i64;
    let sh = src.height as i64;
    out.data
        .par_chunks_mut(w as usize * 4)
        .enumerate()
        .for_each(|(y, row)| {
            let sy = (y as i64 - i64::from(pad)).clamp(0, sh - 1) as usize;
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let sx = (x as i64 - i64::from(pad)).clamp(0, sw - 1) as usize;
                let i = (sy * src.width as usize + sx) * 4;
                px.copy_from_slice(&src.data[i..i + 4]);
            }
        });
    Ok(out)
}

fn horizontal_blur_q16(src: &[u8], dst: &mut [u8], width: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let row_bytes = width as usize * 4;
    dst.par_chunks_mut(row_bytes)
        .zip(src.par_chunks(row_bytes))
        .for_each(|(out_row, in_row)| {
            for x in 0..w {
                let mut acc = [0u64; 4];
                for (ki, &kw) in k.iter().enumerate() {
                    let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                    let idx = sx as usize * 4;
                    for c in 0..4 {
                        acc[c] += u64::from(kw) * u64::from(in_row[idx + c]);
                    }
                }
                let out_idx = x as usize * 4;
                for c in 0..4 {
                    out_row[out_idx + c] = q16_to_u8(acc[c]);
                }
            }
        });
}

fn vertical_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as usize;
    let h = height as i32;
    dst.par_chunks_mut(w * 4)
        .enumerate()
        .for_each(|(y, out_row)| {
            for x in 0..w {
                let mut acc = [0u64; 4];
                for (ki, &kw) in k.iter().enumerate() {
                    let sy = (y as i32 + ki as i32 - radius).clamp(0, h - 1) as usize;
                    let idx = (sy * w + x) * 4;
                    for c in 0..4 {
                        acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                    }
                }
                for c in 0..4 {
                    out_row[x * 4 + c] = q16_to_u8(acc[c]);
                }
            }
        });
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
