//! Template planning: `(template, recipe, media, config) -> RenderPlan`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::foundation::core::{TimeRange, secs};
use crate::foundation::error::{ReelError, ReelResult};
use crate::model::config::RenderConfig;
use crate::model::media::{MediaBundle, MediaField};
use crate::model::plan::{Overlay, RenderPlan, max_overlap};
use crate::model::recipe::Recipe;
use crate::overlay::anim::animation_windows;

pub(crate) mod beat;
pub(crate) mod templates;
pub(crate) mod text;
pub(crate) mod timeline;

use beat::{BeatStrategy, FixedIntervalBeats};

/// The fixed set of layout templates.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    /// Blurred hook, beat-cut ingredient carousel, CTA over the meal.
    BeatSyncedCarousel,
    /// Before, circular reveal of after, counters, end card.
    SplitScreenSwipe,
    /// Hook then numbered steps over a looping background.
    KineticSteps,
    /// Sticker stack, progress bar challenge, reveal.
    PriceTimeChallenge,
    /// Picture-in-picture placeholder over before, b-roll, after.
    GreenScreenPip,
}

impl Template {
    /// Every template, in declaration order.
    pub const ALL: [Template; 5] = [
        Self::BeatSyncedCarousel,
        Self::SplitScreenSwipe,
        Self::KineticSteps,
        Self::PriceTimeChallenge,
        Self::GreenScreenPip,
    ];

    /// Stable snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BeatSyncedCarousel => "beat_synced_carousel",
            Self::SplitScreenSwipe => "split_screen_swipe",
            Self::KineticSteps => "kinetic_steps",
            Self::PriceTimeChallenge => "price_time_challenge",
            Self::GreenScreenPip => "green_screen_pip",
        }
    }

    /// Media fields that must be present.
    pub fn required_media(self) -> &'static [MediaField] {
        match self {
            Self::BeatSyncedCarousel => &[MediaField::Before],
            Self::SplitScreenSwipe => &[MediaField::Before, MediaField::After, MediaField::PlatedMeal],
            Self::KineticSteps => &[MediaField::AnyStill],
            Self::PriceTimeChallenge | Self::GreenScreenPip => {
                &[MediaField::Before, MediaField::After]
            }
        }
    }

    /// Fixed output length.
    pub fn nominal_duration(self) -> Duration {
        secs(match self {
            Self::BeatSyncedCarousel => 11.0,
            Self::SplitScreenSwipe => 9.0,
            Self::KineticSteps | Self::GreenScreenPip => 15.0,
            Self::PriceTimeChallenge => 12.0,
        })
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Template {
    type Err = ReelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ReelError::validation(format!("unknown template '{s}'")))
    }
}

/// Inputs shared by every template strategy.
pub(crate) struct PlanCtx<'a> {
    pub(crate) recipe: &'a Recipe,
    pub(crate) media: &'a MediaBundle,
    pub(crate) cfg: &'a RenderConfig,
    pub(crate) beats: &'a dyn BeatStrategy,
}

/// Template planner with a pluggable beat strategy.
#[derive(Clone, Debug)]
pub struct Planner {
    beats: Arc<dyn BeatStrategy>,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}

impl Planner {
    /// Planner with fixed-interval beats.
    pub fn new() -> Self {
        Self {
            beats: Arc::new(FixedIntervalBeats::default()),
        }
    }

    /// Planner using `beats` for carousel cuts.
    pub fn with_beats(beats: impl BeatStrategy + 'static) -> Self {
        Self {
            beats: Arc::new(beats),
        }
    }

    /// Build and validate the plan for `template`.
    ///
    /// Fails before any frame work on missing media, unusable recipes, durations over the
    /// configured maximum and safe-zone violations.
    #[tracing::instrument(skip_all, fields(template = %template))]
    pub fn plan(
        &self,
        template: Template,
        recipe: &Recipe,
        media: &MediaBundle,
        cfg: &RenderConfig,
    ) -> ReelResult<RenderPlan> {
        cfg.validate()?;
        recipe.validate()?;
        for &field in template.required_media() {
            if !media.has(field) {
                return Err(ReelError::missing_media(template, field));
            }
        }
        media.validate()?;
        if template.nominal_duration() > cfg.max_duration() {
            return Err(ReelError::validation(format!(
                "template {template} runs {:?}, over the {:?} maximum",
                template.nominal_duration(),
                cfg.max_duration()
            )));
        }

        let ctx = PlanCtx {
            recipe,
            media,
            cfg,
            beats: self.beats.as_ref(),
        };
        let mut plan = match template {
            Template::BeatSyncedCarousel => templates::carousel::plan(&ctx)?,
            Template::SplitScreenSwipe => templates::split_swipe::plan(&ctx)?,
            Template::KineticSteps => templates::kinetic_steps::plan(&ctx)?,
            Template::PriceTimeChallenge => templates::price_time::plan(&ctx)?,
            Template::GreenScreenPip => templates::green_screen::plan(&ctx)?,
        };
        plan.audio = media.music.clone();

        enforce_animation_budget(&mut plan.overlays, cfg)?;
        plan.validate(cfg)?;
        tracing::info!(
            items = plan.items.len(),
            overlays = plan.overlays.len(),
            output_ms = plan.output_duration.as_millis() as u64,
            fingerprint = plan.fingerprint(),
            "planned"
        );
        Ok(plan)
    }
}

/// Plan with the default [`Planner`].
pub fn plan(
    template: Template,
    recipe: &Recipe,
    media: &MediaBundle,
    cfg: &RenderConfig,
) -> ReelResult<RenderPlan> {
    Planner::new().plan(template, recipe, media, cfg)
}

/// Delay overlay starts (ends fixed) until at most `max_concurrent` animations overlap.
pub(crate) fn enforce_animation_budget(
    overlays: &mut [Overlay],
    cfg: &RenderConfig,
) -> ReelResult<()> {
    let max = cfg.animation.max_concurrent;
    let mut accepted: Vec<TimeRange> = Vec::new();
    let mut order: Vec<usize> = (0..overlays.len()).collect();
    order.sort_by_key(|&i| overlays[i].start);

    for i in order {
        loop {
            let overlay = &mut overlays[i];
            let layer = overlay.build_layer(cfg)?;
            let windows = animation_windows(&layer, overlay.window(), &cfg.animation);
            let mut all = accepted.clone();
            all.extend(windows.iter().copied());
            let Some(at) = first_excess(&all, max) else {
                accepted.extend(windows);
                break;
            };
            let end = overlay.window().end();
            let exit_start = if layer.fade_out {
                end.saturating_sub(cfg.animation.fade())
            } else {
                end
            };
            // Only conflicts before the exit fade move with the start.
            let movable = at < exit_start;
            let free_at = accepted
                .iter()
                .filter(|w| w.contains(at))
                .map(|w| w.end())
                .min();
            match free_at {
                Some(t) if movable && t > overlay.start && t < end => {
                    tracing::debug!(
                        overlay = %overlay.kind,
                        from_ms = overlay.start.as_millis() as u64,
                        to_ms = t.as_millis() as u64,
                        "delaying overlay to respect animation budget"
                    );
                    overlay.start = t;
                    overlay.duration = end - t;
                }
                _ => {
                    return Err(ReelError::validation(format!(
                        "overlay '{}' exceeds the {max} concurrent animation budget",
                        overlay.kind
                    )));
                }
            }
        }
    }
    debug_assert!(max_overlap(&accepted) <= max);
    Ok(())
}

/// Earliest instant where more than `max` windows are open.
fn first_excess(windows: &[TimeRange], max: usize) -> Option<Duration> {
    let mut events: Vec<(Duration, i32)> = windows
        .iter()
        .filter(|w| !w.duration.is_zero())
        .flat_map(|w| [(w.start, 1), (w.end(), -1)])
        .collect();
    events.sort();
    let mut cur = 0i32;
    for (t, delta) in events {
        cur += delta;
        if cur > max as i32 {
            return Some(t);
        }
    }
    None
}

#[cfg(test)]
#[path = "../../tests/unit/planner/mod.rs"]
mod tests;
