use rayon::prelude::*;

use crate::effects::raster::Raster;
use crate::foundation::core::Point;
use crate::foundation::math::mul_div255_u8;

/// Width of the anti-aliased mask edge in pixels.
const EDGE_PX: f64 = 1.5;

/// Radius that uncovers the whole `width x height` extent from `origin`.
pub fn farthest_corner_distance(origin: Point, width: u32, height: u32) -> f64 {
    let w = f64::from(width);
    let h = f64::from(height);
    [
        Point::new(0.0, 0.0),
        Point::new(w, 0.0),
        Point::new(0.0, h),
        Point::new(w, h),
    ]
    .into_iter()
    .map(|c| c.distance(origin))
    .fold(0.0, f64::max)
}

/// Mask radius at `progress` for a wipe that completes at `reveal_until` (fraction of progress).
pub fn wipe_radius(origin: Point, width: u32, height: u32, progress: f64, reveal_until: f64) -> f64 {
    let k = if reveal_until <= 0.0 {
        1.0
    } else {
        (progress / reveal_until).clamp(0.0, 1.0)
    };
    farthest_corner_distance(origin, width, height) * k
}

/// Keep the pixels of `src` within `radius` of `origin` (extent coordinates); clear the rest.
pub fn circular_mask(src: &Raster, origin: Point, radius: f64) -> Raster {
    let mut out = src.clone();
    circular_mask_in_place(&mut out, origin, radius);
    out
}

/// [`circular_mask`] without a copy.
pub(crate) fn circular_mask_in_place(r: &mut Raster, origin: Point, radius: f64) {
    let (ox, oy) = r.origin;
    let w = r.width as usize;
    if w == 0 {
        return;
    }
    if radius <= 0.0 {
        r.data.fill(0);
        return;
    }
    r.data
        .par_chunks_mut(w * 4)
        .enumerate()
        .for_each(|(y, row)| {
            let cy = f64::from(oy) + y as f64 + 0.5;
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let cx = f64::from(ox) + x as f64 + 0.5;
                let d = Point::new(cx, cy).distance(origin);
                let cover = ((radius - d) / EDGE_PX + 0.5).clamp(0.0, 1.0);
                if cover >= 1.0 {
                    continue;
                }
                let m = (cover * 255.0).round() as u16;
                for c in px.iter_mut() {
                    *c = mul_div255_u8(u16::from(*c), m);
                }
            }
        });
}

#[cfg(test)]
#[path = "../../tests/unit/effects/mask.rs"]
mod tests;
