use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::assets::decode::StillImage;
use crate::effects::fx::EffectChain;
use crate::effects::resample::Fit;
use crate::foundation::core::{Fps, TimeRange, Transform2D};
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::Fnv1a64;
use crate::model::config::RenderConfig;
use crate::model::media::{AudioRef, ClipRef};
use crate::overlay::anim::animation_windows;
use crate::overlay::layer::{Layer, OverlayKind};
use crate::planner::Template;

/// Pixel source of a track item.
#[derive(Clone, Debug, PartialEq)]
pub enum TrackSource {
    /// Decoded still image.
    Still(StillImage),
    /// Video clip sampled at item-local time.
    Clip {
        /// Clip reference.
        clip: ClipRef,
        /// Clip time at the item start.
        offset: Duration,
    },
}

impl TrackSource {
    fn hash_into(&self, h: &mut Fnv1a64) {
        match self {
            Self::Still(img) => {
                let (w, hh, sample) = img.identity();
                h.write_u8(0);
                h.write_u64(u64::from(w));
                h.write_u64(u64::from(hh));
                h.write_u64(sample);
            }
            Self::Clip { clip, offset } => {
                h.write_u8(1);
                h.write_str(&clip.path.to_string_lossy());
                h.write_duration(*offset);
            }
        }
    }

    fn label(&self) -> String {
        match self {
            Self::Still(img) => format!("still {}x{}", img.width, img.height),
            Self::Clip { clip, .. } => format!("clip {}", clip.path.display()),
        }
    }
}

/// How a track item enters over its predecessor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Transition {
    /// Hard cut, no overlap.
    #[default]
    Cut,
    /// Opacity crossfade over the overlap.
    Crossfade(Duration),
    /// Incoming item drawn at full opacity over the outgoing one; its effects supply the mask.
    Reveal(Duration),
}

impl Transition {
    /// Overlap with the previous item.
    pub fn overlap(self) -> Duration {
        match self {
            Self::Cut => Duration::ZERO,
            Self::Crossfade(d) | Self::Reveal(d) => d,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Cut => "cut",
            Self::Crossfade(_) => "crossfade",
            Self::Reveal(_) => "reveal",
        }
    }
}

/// One entry of the base video track.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackItem {
    /// Pixel source.
    pub source: TrackSource,
    /// Window on the master timeline.
    pub range: TimeRange,
    /// Transition from the previous item.
    pub transition_in: Transition,
    /// Source-to-canvas mapping.
    pub fit: Fit,
    /// Extra placement applied after fitting.
    pub transform: Transform2D,
    /// Effects evaluated at item progress.
    pub effects: EffectChain,
}

impl TrackItem {
    /// Cover-fitted still with no effects and a hard cut.
    pub fn still(image: StillImage, range: TimeRange) -> Self {
        Self {
            source: TrackSource::Still(image),
            range,
            transition_in: Transition::Cut,
            fit: Fit::Cover,
            transform: Transform2D::default(),
            effects: EffectChain::new(),
        }
    }

    /// Set the incoming transition.
    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition_in = transition;
        self
    }

    /// Set the effect chain.
    pub fn with_effects(mut self, effects: EffectChain) -> Self {
        self.effects = effects;
        self
    }
}

/// Pure overlay builder; captures only owned immutable data.
pub type OverlayBuilder = Arc<dyn Fn(&RenderConfig) -> ReelResult<Layer> + Send + Sync>;

/// An overlay scheduled on the master timeline.
#[derive(Clone)]
pub struct Overlay {
    /// Overlay type.
    pub kind: OverlayKind,
    /// Start on the master timeline; local animation time zero.
    pub start: Duration,
    /// Visible length.
    pub duration: Duration,
    /// Layer builder.
    pub build: OverlayBuilder,
}

impl fmt::Debug for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlay")
            .field("kind", &self.kind)
            .field("start", &self.start)
            .field("duration", &self.duration)
            .finish_non_exhaustive()
    }
}

impl Overlay {
    /// Schedule `build` over `window`.
    pub fn new(
        kind: OverlayKind,
        window: TimeRange,
        build: impl Fn(&RenderConfig) -> ReelResult<Layer> + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            start: window.start,
            duration: window.duration,
            build: Arc::new(build),
        }
    }

    /// Master-timeline window.
    pub fn window(&self) -> TimeRange {
        TimeRange::new(self.start, self.duration)
    }

    /// Run the builder and check that it produced this overlay's kind.
    pub fn build_layer(&self, cfg: &RenderConfig) -> ReelResult<Layer> {
        let layer = (self.build)(cfg)?;
        if layer.kind != self.kind {
            return Err(ReelError::evaluation(format!(
                "overlay scheduled as '{}' built a '{}' layer",
                self.kind, layer.kind
            )));
        }
        Ok(layer)
    }
}

/// Fully resolved timeline for one render.
#[derive(Clone, Debug)]
pub struct RenderPlan {
    /// Template that produced the plan.
    pub template: Template,
    /// Base track in timeline order.
    pub items: Vec<TrackItem>,
    /// Overlays in schedule order.
    pub overlays: Vec<Overlay>,
    /// Music muxed into the export.
    pub audio: Option<AudioRef>,
    /// Total output length.
    pub output_duration: Duration,
}

impl RenderPlan {
    /// Sum of all item lengths.
    pub fn item_duration_sum(&self) -> Duration {
        self.items.iter().map(|i| i.range.duration).sum()
    }

    /// Sum of all transition overlaps.
    pub fn overlap_sum(&self) -> Duration {
        self.items.iter().map(|i| i.transition_in.overlap()).sum()
    }

    /// Number of frames the compositor emits.
    pub fn frame_count(&self, fps: Fps) -> u64 {
        fps.frames_in(self.output_duration)
    }

    /// Check the timeline laws, overlay windows and safe zones.
    pub fn validate(&self, cfg: &RenderConfig) -> ReelResult<()> {
        let Some(first) = self.items.first() else {
            return Err(ReelError::validation("render plan has no track items"));
        };
        if !first.range.start.is_zero() || first.transition_in != Transition::Cut {
            return Err(ReelError::validation(
                "first track item must start at zero with a cut",
            ));
        }
        for (i, pair) in self.items.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            let overlap = next.transition_in.overlap();
            if next.range.start + overlap != prev.range.end() {
                return Err(ReelError::validation(format!(
                    "track item {} must start {:?} before item {} ends",
                    i + 1,
                    overlap,
                    i
                )));
            }
        }
        for (i, item) in self.items.iter().enumerate() {
            let incoming = item.transition_in.overlap();
            let outgoing = self
                .items
                .get(i + 1)
                .map(|n| n.transition_in.overlap())
                .unwrap_or_default();
            if item.range.duration.is_zero() || item.range.duration < incoming + outgoing {
                return Err(ReelError::validation(format!(
                    "track item {i} is shorter than its transitions"
                )));
            }
            item.effects.validate()?;
        }

        let law = self.item_duration_sum().saturating_sub(self.overlap_sum());
        if law != self.output_duration {
            return Err(ReelError::validation(format!(
                "output duration {:?} != item sum minus overlaps {:?}",
                self.output_duration, law
            )));
        }
        if self.output_duration > cfg.max_duration() {
            return Err(ReelError::validation(format!(
                "output duration {:?} exceeds max {:?}",
                self.output_duration,
                cfg.max_duration()
            )));
        }

        for overlay in &self.overlays {
            if overlay.duration.is_zero() || overlay.window().end() > self.output_duration {
                return Err(ReelError::validation(format!(
                    "overlay '{}' window {:?}+{:?} is outside the output",
                    overlay.kind, overlay.start, overlay.duration
                )));
            }
            overlay.build_layer(cfg)?;
        }
        Ok(())
    }

    /// Largest number of overlay animations active at one instant.
    pub fn max_concurrent_animations(&self, cfg: &RenderConfig) -> ReelResult<usize> {
        let mut windows = Vec::new();
        for overlay in &self.overlays {
            let layer = overlay.build_layer(cfg)?;
            windows.extend(animation_windows(
                &layer,
                overlay.window(),
                &cfg.animation,
            ));
        }
        Ok(max_overlap(&windows))
    }

    /// Structural hash of the timeline, stable across runs for identical inputs.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_str(self.template.as_str());
        h.write_duration(self.output_duration);
        h.write_u64(self.items.len() as u64);
        for item in &self.items {
            item.source.hash_into(&mut h);
            h.write_duration(item.range.start);
            h.write_duration(item.range.duration);
            h.write_str(item.transition_in.name());
            h.write_duration(item.transition_in.overlap());
            for effect in item.effects.effects() {
                h.write_str(effect.name());
            }
        }
        h.write_u64(self.overlays.len() as u64);
        for overlay in &self.overlays {
            h.write_str(overlay.kind.as_str());
            h.write_duration(overlay.start);
            h.write_duration(overlay.duration);
        }
        match &self.audio {
            Some(a) => h.write_str(&a.path.to_string_lossy()),
            None => h.write_u8(0),
        }
        h.finish()
    }

    /// Serializable description for logs and tooling.
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            template: self.template,
            output_ms: millis(self.output_duration),
            items: self
                .items
                .iter()
                .map(|i| ItemSummary {
                    source: i.source.label(),
                    start_ms: millis(i.range.start),
                    duration_ms: millis(i.range.duration),
                    transition: i.transition_in.name().to_string(),
                    effects: i.effects.effects().iter().map(|e| e.name().to_string()).collect(),
                })
                .collect(),
            overlays: self
                .overlays
                .iter()
                .map(|o| OverlaySummary {
                    kind: o.kind.as_str().to_string(),
                    start_ms: millis(o.start),
                    duration_ms: millis(o.duration),
                })
                .collect(),
        }
    }
}

/// JSON-friendly plan description.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PlanSummary {
    /// Template name.
    pub template: Template,
    /// Output length in milliseconds.
    pub output_ms: u64,
    /// Base track.
    pub items: Vec<ItemSummary>,
    /// Scheduled overlays.
    pub overlays: Vec<OverlaySummary>,
}

/// One track item in a [`PlanSummary`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ItemSummary {
    /// Source label.
    pub source: String,
    /// Start in milliseconds.
    pub start_ms: u64,
    /// Length in milliseconds.
    pub duration_ms: u64,
    /// Incoming transition name.
    pub transition: String,
    /// Effect names in chain order.
    pub effects: Vec<String>,
}

/// One overlay in a [`PlanSummary`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct OverlaySummary {
    /// Overlay kind.
    pub kind: String,
    /// Start in milliseconds.
    pub start_ms: u64,
    /// Length in milliseconds.
    pub duration_ms: u64,
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Peak number of simultaneously open half-open ranges.
pub(crate) fn max_overlap(windows: &[TimeRange]) -> usize {
    let mut events: Vec<(Duration, i32)> = windows
        .iter()
        .filter(|w| !w.duration.is_zero())
        .flat_map(|w| [(w.start, 1), (w.end(), -1)])
        .collect();
    // Ends sort before starts at the same instant.
    events.sort();
    let mut cur = 0i32;
    let mut peak = 0i32;
    for (_, delta) in events {
        cur += delta;
        peak = peak.max(cur);
    }
    peak as usize
}

#[cfg(test)]
#[path = "../../tests/unit/model/plan.rs"]
mod tests;
