//! Per-item frame production: source, fit, effect chain, placement.

use std::time::Duration;

use crate::assets::media::clip_source_time;
use crate::effects::fx::EffectChain;
use crate::effects::raster::Raster;
use crate::effects::resample::{Fit, fit_into, fit_to};
use crate::foundation::core::{Canvas, TimeRange, Transform2D};
use crate::foundation::error::{ReelError, ReelResult};
use crate::model::plan::{TrackItem, TrackSource};
use crate::render::clip::ClipDecoder;
use crate::render::cpu::{CpuCanvas, draw_image, image_paint};
use crate::render::pool::FramePool;

enum ItemSource {
    /// Fitted still with the progress-independent part of the chain already applied.
    Still(Raster),
    Clip {
        decoder: ClipDecoder,
        offset: Duration,
    },
}

/// Produces canvas-sized premultiplied frames for one track item.
pub(crate) struct FrameWriter {
    canvas: Canvas,
    range: TimeRange,
    fit: Fit,
    transform: Transform2D,
    effects: EffectChain,
    static_len: usize,
    source: ItemSource,
    placer: Option<CpuCanvas>,
}

impl FrameWriter {
    pub(crate) fn for_item(item: &TrackItem, canvas: Canvas) -> ReelResult<Self> {
        let (static_len, source) = match &item.source {
            TrackSource::Still(img) => {
                let fitted = fit_to(
                    img.rgba8_premul.as_slice(),
                    img.width,
                    img.height,
                    canvas.width,
                    canvas.height,
                    item.fit,
                )?;
                let n = item.effects.static_prefix_len();
                let prefix = item.effects.effects()[..n]
                    .iter()
                    .cloned()
                    .fold(EffectChain::new(), EffectChain::with);
                let cached = prefix.apply(&fitted, 0.0)?;
                tracing::debug!(
                    static_effects = n,
                    total_effects = item.effects.effects().len(),
                    "prepared still item"
                );
                (n, ItemSource::Still(cached))
            }
            TrackSource::Clip { clip, offset } => (
                0,
                ItemSource::Clip {
                    decoder: ClipDecoder::open(clip)?,
                    offset: *offset,
                },
            ),
        };
        let placer = if item.transform.is_identity() {
            None
        } else {
            Some(CpuCanvas::new(canvas.width, canvas.height)?)
        };
        Ok(Self {
            canvas,
            range: item.range,
            fit: item.fit,
            transform: item.transform,
            effects: item.effects.clone(),
            static_len,
            source,
            placer,
        })
    }

    /// Frame at master time `t`, in a buffer borrowed from `pool`.
    ///
    /// Time-dependent effects run in place on pool buffers, so steady-state frames allocate no
    /// pixel memory.
    pub(crate) fn frame_at(&mut self, t: Duration, pool: &mut FramePool) -> ReelResult<Vec<u8>> {
        let progress = self.range.progress(t);
        let (w, h) = (self.canvas.width, self.canvas.height);
        let mut work = Raster::from_premul(w, h, pool.borrow(w, h))?;
        let start = match &mut self.source {
            ItemSource::Still(prefix) => {
                if prefix.data.len() != work.data.len() {
                    return Err(ReelError::evaluation(format!(
                        "item frame is {} bytes, canvas needs {}",
                        prefix.data.len(),
                        work.data.len()
                    )));
                }
                work.data.copy_from_slice(&prefix.data);
                self.static_len
            }
            ItemSource::Clip { decoder, offset } => {
                let local = self.range.local(t);
                let src_t = clip_source_time(local, *offset, decoder.duration());
                let frame = decoder.frame_at(src_t)?;
                fit_into(
                    frame.rgba8_premul.as_slice(),
                    frame.width,
                    frame.height,
                    self.fit,
                    &mut work,
                )?;
                0
            }
        };

        if start < self.effects.effects().len() {
            let mut scratch = pool.borrow(w, h);
            let evaluated = self
                .effects
                .apply_range_in_place(&mut work, start, progress, &mut scratch);
            pool.release(w, h, scratch);
            evaluated?;
        }

        let mut out = work.data;
        if let Some(placer) = self.placer.as_mut() {
            let paint = image_paint(&out, w, h)?;
            let affine = self.transform.to_affine(self.canvas.rect().center());
            let ctx = placer.begin();
            draw_image(ctx, paint, f64::from(w), f64::from(h), affine, 1.0);
            out.copy_from_slice(placer.finish());
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame_writer.rs"]
mod tests;
