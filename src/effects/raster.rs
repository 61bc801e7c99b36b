use crate::foundation::error::{ReelError, ReelResult};

/// Premultiplied RGBA8 image positioned relative to an effect chain's input extent.
///
/// `origin` is the offset of this raster's top-left pixel from the chain input's top-left pixel.
/// Filters may grow the extent (blur); [`Raster::clamp_to`] brings it back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Offset from the chain input extent.
    pub origin: (i32, i32),
    /// Tightly packed premultiplied RGBA8 rows.
    pub data: Vec<u8>,
}

impl Raster {
    /// Wrap premultiplied bytes at the origin.
    pub fn from_premul(width: u32, height: u32, data: Vec<u8>) -> ReelResult<Self> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(ReelError::evaluation(format!(
                "raster byte len mismatch: got {}, expected {expected}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            origin: (0, 0),
            data,
        })
    }

    /// Fully transparent raster at the origin.
    pub fn transparent(width: u32, height: u32) -> ReelResult<Self> {
        Self::from_premul(width, height, vec![0; byte_len(width, height)?])
    }

    /// Single-color raster at the origin.
    pub fn filled(width: u32, height: u32, premul: [u8; 4]) -> ReelResult<Self> {
        let n = (width as usize) * (height as usize);
        Self::from_premul(width, height, premul.repeat(n))
    }

    /// Return `true` when this raster exactly covers a `width x height` extent at the origin.
    pub fn matches_extent(&self, width: u32, height: u32) -> bool {
        self.origin == (0, 0) && self.width == width && self.height == height
    }

    /// Pixel at `(x, y)` in this raster's own coordinates.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Crop or pad to the `width x height` extent at the origin.
    ///
    /// Areas of the extent this raster does not cover become transparent.
    pub fn clamp_to(self, width: u32, height: u32) -> ReelResult<Raster> {
        if self.matches_extent(width, height) {
            return Ok(self);
        }
        let mut out = Raster::transparent(width, height)?;
        let (ox, oy) = self.origin;
        let x_start = ox.max(0);
        let x_end = (ox + self.width as i32).min(width as i32);
        let y_start = oy.max(0);
        let y_end = (oy + self.height as i32).min(height as i32);
        if x_start >= x_end || y_start >= y_end {
            return Ok(out);
        }
        let row_bytes = ((x_end - x_start) as usize) * 4;
        for y in y_start..y_end {
            let src_x = (x_start - ox) as usize;
            let src_y = (y - oy) as usize;
            let src_i = (src_y * self.width as usize + src_x) * 4;
            let dst_i = ((y as usize) * width as usize + x_start as usize) * 4;
            out.data[dst_i..dst_i + row_bytes].copy_from_slice(&self.data[src_i..src_i + row_bytes]);
        }
        Ok(out)
    }
}

pub(crate) fn byte_len(width: u32, height: u32) -> ReelResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| ReelError::evaluation("raster size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/raster.rs"]
mod tests;
