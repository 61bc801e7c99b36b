use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Decoded still image, premultiplied RGBA8, cheap to clone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StillImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 rows.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl StillImage {
    /// Wrap already premultiplied pixels.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> ReelResult<Self> {
        if width == 0 || height == 0 {
            return Err(ReelError::validation("still image must be non-empty"));
        }
        let expected = (width as usize) * (height as usize) * 4;
        if rgba8_premul.len() != expected {
            return Err(ReelError::validation(format!(
                "still image byte len mismatch: got {}, expected {expected}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Single-color image, handy for placeholders and tests.
    pub fn solid(width: u32, height: u32, color: Rgba8Premul) -> ReelResult<Self> {
        let n = (width as usize) * (height as usize);
        Self::from_premul(width, height, color.to_array().repeat(n))
    }

    /// Decode encoded image bytes (PNG, JPEG, ...).
    pub fn decode(bytes: &[u8]) -> ReelResult<Self> {
        let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let mut rgba8_premul = rgba.into_raw();
        premultiply_rgba8_in_place(&mut rgba8_premul);
        Self::from_premul(width, height, rgba8_premul)
    }

    /// Read and decode an image file.
    pub fn open(path: &Path) -> ReelResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
        Self::decode(&bytes).map_err(|e| match e {
            ReelError::Other(err) => {
                ReelError::Other(err.context(format!("image '{}'", path.display())))
            }
            other => other,
        })
    }

    /// Structural hash input: dimensions plus a sample of the pixel bytes.
    pub(crate) fn identity(&self) -> (u32, u32, u64) {
        let mut h = crate::foundation::math::Fnv1a64::new_default();
        let data = self.rgba8_premul.as_slice();
        let step = (data.len() / 4096).max(1);
        for b in data.iter().step_by(step) {
            h.write_u8(*b);
        }
        (self.width, self.height, h.finish())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
