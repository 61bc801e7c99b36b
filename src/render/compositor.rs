use std::path::Path;
use std::time::{Duration, Instant};

use crate::effects::composite::{crossfade_over_in_place, over_in_place};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::cancel::CancelToken;
use crate::foundation::core::{Canvas, Fps, FrameIndex, TimeRange};
use crate::foundation::error::{ReelError, ReelResult};
use crate::model::config::RenderConfig;
use crate::model::plan::{RenderPlan, Transition};
use crate::overlay::layer::Layer;
use crate::render::cpu::CpuCanvas;
use crate::render::frame::FrameRGBA;
use crate::render::frame_writer::FrameWriter;
use crate::render::overlay_raster::OverlayRenderer;
use crate::render::pool::{FramePool, FramePoolOpts};

/// Summary of one compositing pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompositeStats {
    /// Frames pushed to the sink.
    pub frames: u64,
    /// Frame buffers allocated (the rest were reused from the pool).
    pub buffer_allocs: u64,
    /// Wall time spent compositing.
    pub elapsed: Duration,
}

struct BuiltOverlay {
    window: TimeRange,
    layer: Layer,
}

/// Turns a [`RenderPlan`] into a continuous run of premultiplied frames.
///
/// Frame `f` shows master time `f / fps`. Items are drawn back to front: during a crossfade the
/// outgoing item fades out as the incoming one fades in; during a reveal the incoming item is
/// drawn at full opacity over the outgoing one and its own effects provide the mask. Overlays are
/// built once up front and drawn on top while their window is open.
pub struct Compositor {
    plan: RenderPlan,
    canvas: Canvas,
    fps: Fps,
    overlays: Vec<BuiltOverlay>,
    renderer: OverlayRenderer,
    overlay_canvas: CpuCanvas,
    writers: Vec<Option<FrameWriter>>,
    pool: FramePool,
}

impl Compositor {
    /// Validate `plan` against `cfg` and build its overlay layers.
    #[tracing::instrument(skip_all, fields(template = %plan.template))]
    pub fn new(plan: RenderPlan, cfg: &RenderConfig) -> ReelResult<Self> {
        plan.validate(cfg)?;
        let overlays = plan
            .overlays
            .iter()
            .map(|o| {
                Ok(BuiltOverlay {
                    window: o.window(),
                    layer: o.build_layer(cfg)?,
                })
            })
            .collect::<ReelResult<Vec<_>>>()?;
        let writers = plan.items.iter().map(|_| None).collect();
        Ok(Self {
            canvas: cfg.canvas,
            fps: cfg.fps,
            overlays,
            renderer: OverlayRenderer::new(cfg)?,
            overlay_canvas: CpuCanvas::new(cfg.canvas.width, cfg.canvas.height)?,
            writers,
            pool: FramePool::new(FramePoolOpts::default()),
            plan,
        })
    }

    /// Number of frames in the output.
    pub fn frame_count(&self) -> u64 {
        self.plan.frame_count(self.fps)
    }

    /// Output canvas.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Output frame rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Total output length.
    pub fn output_duration(&self) -> Duration {
        self.plan.output_duration
    }

    /// Music muxed under the video, if any.
    pub fn audio_path(&self) -> Option<&Path> {
        self.plan.audio.as_ref().map(|a| a.path.as_path())
    }

    /// Composite a single frame.
    pub fn render_frame(&mut self, idx: FrameIndex) -> ReelResult<FrameRGBA> {
        if idx.0 >= self.frame_count() {
            return Err(ReelError::validation(format!(
                "frame {} is outside the {} frame output",
                idx.0,
                self.frame_count()
            )));
        }
        let data = self.compose(self.fps.frame_time(idx))?;
        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data,
            premultiplied: true,
        })
    }

    /// Push every frame into `sink`, checking `cancel` before each one.
    #[tracing::instrument(skip_all, fields(template = %self.plan.template))]
    pub fn render(
        mut self,
        sink: &mut dyn FrameSink,
        cancel: &CancelToken,
    ) -> ReelResult<CompositeStats> {
        let started = Instant::now();
        let frames = self.frame_count();
        let (w, h) = (self.canvas.width, self.canvas.height);
        sink.begin(SinkConfig {
            width: w,
            height: h,
            fps: self.fps,
            audio: self.plan.audio.as_ref().map(|a| a.path.clone()),
        })?;

        for f in 0..frames {
            cancel.check()?;
            let idx = FrameIndex(f);
            let frame = FrameRGBA {
                width: w,
                height: h,
                data: self.compose(self.fps.frame_time(idx))?,
                premultiplied: true,
            };
            sink.push_frame(idx, &frame)?;
            self.pool.release(w, h, frame.data);
        }
        sink.end()?;

        let stats = CompositeStats {
            frames,
            buffer_allocs: self.pool.stats().alloc_buffers,
            elapsed: started.elapsed(),
        };
        tracing::info!(
            frames,
            buffer_allocs = stats.buffer_allocs,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "composited"
        );
        Ok(stats)
    }

    fn compose(&mut self, t: Duration) -> ReelResult<Vec<u8>> {
        let items = &self.plan.items;
        let j = items
            .iter()
            .rposition(|it| it.range.start <= t)
            .ok_or_else(|| ReelError::evaluation(format!("no track item covers {t:?}")))?;
        let incoming = &items[j];
        let overlap = incoming.transition_in.overlap();
        let transition = incoming.transition_in;
        let in_transition = j > 0 && !overlap.is_zero() && t < incoming.range.start + overlap;
        let mix = if in_transition {
            (t - incoming.range.start).as_secs_f64() / overlap.as_secs_f64()
        } else {
            1.0
        };

        // Drop writers for items that are no longer on screen.
        for (i, w) in self.writers.iter_mut().enumerate() {
            if i != j && !(in_transition && i + 1 == j) {
                *w = None;
            }
        }

        let mut out = if in_transition {
            let a = self.item_frame(j - 1, t)?;
            let b = self.item_frame(j, t)?;
            let mut out = self.pool.borrow(self.canvas.width, self.canvas.height);
            match transition {
                Transition::Reveal(_) => {
                    over_in_place(&mut out, &a, 1.0)?;
                    over_in_place(&mut out, &b, 1.0)?;
                }
                Transition::Crossfade(_) | Transition::Cut => {
                    crossfade_over_in_place(&mut out, &a, &b, mix as f32)?;
                }
            }
            self.pool.release(self.canvas.width, self.canvas.height, a);
            self.pool.release(self.canvas.width, self.canvas.height, b);
            out
        } else {
            self.item_frame(j, t)?
        };

        let mut any = false;
        let ctx = self.overlay_canvas.begin();
        for o in self.overlays.iter().filter(|o| o.window.contains(t)) {
            self.renderer
                .draw_layer(ctx, &o.layer, o.window.local(t), o.window.duration)?;
            any = true;
        }
        if any {
            over_in_place(&mut out, self.overlay_canvas.finish(), 1.0)?;
        }
        Ok(out)
    }

    fn item_frame(&mut self, i: usize, t: Duration) -> ReelResult<Vec<u8>> {
        if self.writers[i].is_none() {
            self.writers[i] = Some(FrameWriter::for_item(&self.plan.items[i], self.canvas)?);
        }
        let Some(writer) = self.writers[i].as_mut() else {
            return Err(ReelError::evaluation("frame writer missing"));
        };
        writer.frame_at(t, &mut self.pool)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
