use rayon::prelude::*;

use crate::effects::raster::Raster;

/// Rec. 709 luma weights.
const LUMA: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// 4x5 row-major color matrix applied to straight-alpha RGBA in `[0, 1]`.
pub type ColorMatrix = [f32; 20];

/// Matrix that raises contrast and saturation by the given amounts (`0.0` is identity).
///
/// Contrast pivots around mid grey; saturation mixes each channel away from luma.
pub fn color_pop_matrix(contrast: f32, saturation: f32) -> ColorMatrix {
    let c = 1.0 + contrast;
    let c_off = 0.5 * (1.0 - c);
    let s = 1.0 + saturation;
    let sat = |row: usize, col: usize| -> f32 {
        let base = (1.0 - s) * LUMA[col];
        if row == col { base + s } else { base }
    };
    let mut m = [0.0f32; 20];
    for row in 0..3 {
        for col in 0..3 {
            m[row * 5 + col] = c * sat(row, col);
        }
        m[row * 5 + 4] = c_off;
    }
    m[18] = 1.0;
    m
}

/// Apply `m` to every pixel of a premultiplied raster.
pub fn apply_color_matrix(src: &Raster, m: &ColorMatrix) -> Raster {
    let mut out = src.clone();
    apply_color_matrix_in_place(&mut out, m);
    out
}

/// [`apply_color_matrix`] without a copy.
pub(crate) fn apply_color_matrix_in_place(r: &mut Raster, m: &ColorMatrix) {
    let row_bytes = (r.width as usize * 4).max(4);
    r.data
        .par_chunks_mut(row_bytes)
        .for_each(|row| color_matrix_rgba8_premul(row, m));
}

fn color_matrix_rgba8_premul(row: &mut [u8], m: &ColorMatrix) {
    for px in row.chunks_exact_mut(4) {
        let pa = f32::from(px[3]) / 255.0;
        if pa <= 0.0 {
            px.copy_from_slice(&[0, 0, 0, 0]);
            continue;
        }
        let inv_a = 1.0 / pa;
        let r = f32::from(px[0]) / 255.0 * inv_a;
        let g = f32::from(px[1]) / 255.0 * inv_a;
        let b = f32::from(px[2]) / 255.0 * inv_a;
        let a = pa;

        let out_r = (m[0] * r + m[1] * g + m[2] * b + m[3] * a + m[4]).clamp(0.0, 1.0);
        let out_g = (m[5] * r + m[6] * g + m[7] * b + m[8] * a + m[9]).clamp(0.0, 1.0);
        let out_b = (m[10] * r + m[11] * g + m[12] * b + m[13] * a + m[14]).clamp(0.0, 1.0);
        let out_a = (m[15] * r + m[16] * g + m[17] * b + m[18] * a + m[19]).clamp(0.0, 1.0);

        px[0] = to_u8(out_r * out_a);
        px[1] = to_u8(out_g * out_a);
        px[2] = to_u8(out_b * out_a);
        px[3] = to_u8(out_a);
    }
}

fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/color.rs"]
mod tests;
