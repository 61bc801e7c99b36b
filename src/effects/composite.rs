use rayon::prelude::*;

use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::{add_sat_u8, mul_div255_u8};

/// Source-over `src` onto `dst` with an extra opacity multiplier.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> ReelResult<()> {
    check_lengths(dst.len(), &[src.len()], "over_in_place")?;
    let op = opacity_u16(opacity);
    if op == 0 {
        return Ok(());
    }
    dst.par_chunks_mut(CHUNK)
        .zip(src.par_chunks(CHUNK))
        .for_each(|(d, s)| {
            for (dp, sp) in d.chunks_exact_mut(4).zip(s.chunks_exact(4)) {
                let px = if op == 255 {
                    [sp[0], sp[1], sp[2], sp[3]]
                } else {
                    [
                        mul_div255_u8(u16::from(sp[0]), op),
                        mul_div255_u8(u16::from(sp[1]), op),
                        mul_div255_u8(u16::from(sp[2]), op),
                        mul_div255_u8(u16::from(sp[3]), op),
                    ]
                };
                let out = premul_over_px([dp[0], dp[1], dp[2], dp[3]], px);
                dp.copy_from_slice(&out);
            }
        });
    Ok(())
}

/// Mix outgoing `a` and incoming `b` at `t` (0 = all `a`, 1 = all `b`) and draw the mix over `dst`.
pub fn crossfade_over_in_place(dst: &mut [u8], a: &[u8], b: &[u8], t: f32) -> ReelResult<()> {
    check_lengths(dst.len(), &[a.len(), b.len()], "crossfade_over_in_place")?;
    let tt = opacity_u16(t);
    let it = 255u16 - tt;
    dst.par_chunks_mut(CHUNK)
        .zip(a.par_chunks(CHUNK).zip(b.par_chunks(CHUNK)))
        .for_each(|(d, (ac, bc))| {
            for ((dp, ap), bp) in d
                .chunks_exact_mut(4)
                .zip(ac.chunks_exact(4))
                .zip(bc.chunks_exact(4))
            {
                let mut src = [0u8; 4];
                for c in 0..4 {
                    let av = mul_div255_u8(u16::from(ap[c]), it);
                    let bv = mul_div255_u8(u16::from(bp[c]), tt);
                    src[c] = add_sat_u8(av, bv);
                }
                let out = premul_over_px([dp[0], dp[1], dp[2], dp[3]], src);
                dp.copy_from_slice(&out);
            }
        });
    Ok(())
}

/// Fill `dst` with one premultiplied color.
pub fn fill(dst: &mut [u8], premul: [u8; 4]) {
    for px in dst.chunks_exact_mut(4) {
        px.copy_from_slice(&premul);
    }
}

pub(crate) fn premul_over_px(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let sa = u16::from(src[3]);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }
    let inv = 255u16 - sa;
    let mut out = [0u8; 4];
    out[3] = add_sat_u8(src[3], mul_div255_u8(u16::from(dst[3]), inv));
    for c in 0..3 {
        out[c] = add_sat_u8(src[c], mul_div255_u8(u16::from(dst[c]), inv));
    }
    out
}

const CHUNK: usize = 4 * 4096;

fn opacity_u16(v: f32) -> u16 {
    ((v.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16
}

fn check_lengths(dst: usize, others: &[usize], what: &str) -> ReelResult<()> {
    if !dst.is_multiple_of(4) || others.iter().any(|&n| n != dst) {
        return Err(ReelError::evaluation(format!(
            "{what} expects equal-length rgba8 buffers"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
