//! One planning function per template.

use std::time::Duration;

use crate::assets::decode::StillImage;
use crate::effects::fx::{Effect, EffectChain};
use crate::foundation::core::TimeRange;
use crate::foundation::error::{ReelError, ReelResult};
use crate::model::media::{ClipRef, MediaField};
use crate::model::plan::{Overlay, TrackSource, Transition};
use crate::overlay::factory;
use crate::overlay::layer::OverlayKind;
use crate::planner::{PlanCtx, Template};
use crate::planner::text::{cta_text, hook_text};

pub(crate) mod carousel;
pub(crate) mod green_screen;
pub(crate) mod kinetic_steps;
pub(crate) mod price_time;
pub(crate) mod split_swipe;

/// Ingredients needed before clip segments are preferred over stills.
const MIN_INGREDIENTS_FOR_CLIPS: usize = 2;

/// A background candidate.
#[derive(Clone, Debug)]
pub(crate) enum Background {
    Clip(ClipRef),
    Still(MediaField, StillImage),
}

impl Background {
    /// Track source and effects for the `index`-th background segment.
    pub(crate) fn segment(&self, index: usize) -> (TrackSource, EffectChain) {
        match self {
            Self::Clip(clip) => (
                TrackSource::Clip {
                    clip: clip.clone(),
                    offset: Duration::ZERO,
                },
                EffectChain::new(),
            ),
            Self::Still(field, img) => {
                let chain = still_chain(*field).with(Effect::pan_zoom(index));
                (TrackSource::Still(img.clone()), chain)
            }
        }
    }
}

/// Color pop for finished-dish shots, nothing otherwise.
pub(crate) fn still_chain(field: MediaField) -> EffectChain {
    match field {
        MediaField::After => EffectChain::new().with(Effect::color_pop()),
        _ => EffectChain::new(),
    }
}

/// Usable clips, or `None` when stills must stand in for them.
pub(crate) fn clip_backgrounds(ctx: &PlanCtx<'_>) -> Option<Vec<Background>> {
    let clips = ctx.media.usable_clips();
    if clips.is_empty() || ctx.recipe.ingredients.len() < MIN_INGREDIENTS_FOR_CLIPS {
        return None;
    }
    Some(clips.iter().cloned().map(Background::Clip).collect())
}

/// Stills in `order`, skipping absent fields.
pub(crate) fn still_backgrounds(ctx: &PlanCtx<'_>, order: &[MediaField]) -> Vec<Background> {
    order
        .iter()
        .filter_map(|&field| {
            let img = match field {
                MediaField::Before => ctx.media.before.as_ref(),
                MediaField::After => ctx.media.after.as_ref(),
                MediaField::PlatedMeal => ctx.media.plated_meal.as_ref(),
                MediaField::Clips | MediaField::AnyStill => None,
            }?;
            Some(Background::Still(field, img.clone()))
        })
        .collect()
}

/// Clips when usable, otherwise stills in `order`.
pub(crate) fn backgrounds(ctx: &PlanCtx<'_>, order: &[MediaField]) -> Vec<Background> {
    clip_backgrounds(ctx).unwrap_or_else(|| still_backgrounds(ctx, order))
}

/// Best finished-dish still: plated, then after, then before.
pub(crate) fn hero(ctx: &PlanCtx<'_>) -> ReelResult<Background> {
    still_backgrounds(ctx, &[MediaField::PlatedMeal, MediaField::After, MediaField::Before])
        .into_iter()
        .next()
        .ok_or_else(|| ReelError::validation("media bundle has no still image"))
}

/// Still for a required field.
pub(crate) fn required_still(
    ctx: &PlanCtx<'_>,
    template: Template,
    field: MediaField,
) -> ReelResult<StillImage> {
    match still_backgrounds(ctx, &[field]).pop() {
        Some(Background::Still(_, img)) => Ok(img),
        _ => Err(ReelError::missing_media(template, field)),
    }
}

/// Configured crossfade transition.
pub(crate) fn crossfade(ctx: &PlanCtx<'_>) -> Transition {
    Transition::Crossfade(ctx.cfg.crossfade())
}

pub(crate) fn hook_overlay(ctx: &PlanCtx<'_>, window: TimeRange) -> Overlay {
    let text = hook_text(ctx.recipe);
    Overlay::new(OverlayKind::HeroHook, window, move |cfg| {
        factory::hero_hook(&text, cfg)
    })
}

pub(crate) fn cta_overlay(ctx: &PlanCtx<'_>, window: TimeRange) -> Overlay {
    let text = cta_text(ctx.cfg.cta_seed);
    Overlay::new(OverlayKind::Cta, window, move |cfg| {
        factory::cta_sticker(text, cfg)
    })
}

#[cfg(test)]
#[path = "../../../tests/unit/planner/templates.rs"]
mod tests;
