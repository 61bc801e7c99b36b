//! Hook, then one numbered step at a time over crossfading backgrounds.

use std::time::Duration;

use crate::foundation::core::TimeRange;
use crate::foundation::error::{ReelError, ReelResult};
use crate::model::media::MediaField;
use crate::model::plan::{Overlay, RenderPlan};
use crate::overlay::factory;
use crate::overlay::layer::OverlayKind;
use crate::planner::templates::{backgrounds, crossfade, hook_overlay};
use crate::planner::text::step_texts;
use crate::planner::timeline::{Timeline, split_even};
use crate::planner::{PlanCtx, Template};

const TOTAL: Duration = Duration::from_secs(15);
const HOOK: Duration = Duration::from_secs(2);
const MIN_SEGMENTS: usize = 3;

pub(crate) fn plan(ctx: &PlanCtx<'_>) -> ReelResult<RenderPlan> {
    let template = Template::KineticSteps;
    let steps = step_texts(ctx.recipe);
    if steps.is_empty() {
        return Err(ReelError::invalid_recipe(
            "kinetic steps needs at least one non-empty step",
        ));
    }
    let sources = backgrounds(
        ctx,
        &[MediaField::After, MediaField::PlatedMeal, MediaField::Before],
    );
    if sources.is_empty() {
        return Err(ReelError::missing_media(template, MediaField::AnyStill));
    }

    let fade = crossfade(ctx);
    let k = sources.len().max(MIN_SEGMENTS);
    let mut tl = Timeline::new();
    for (i, len) in split_even(TOTAL, k as u32, fade.overlap()).into_iter().enumerate() {
        let (source, effects) = sources[i % sources.len()].segment(i);
        tl.push(source, len, fade, effects)?;
    }
    let (items, output_duration) = tl.finish();

    let mut overlays = Vec::with_capacity(steps.len() + 1);
    overlays.push(hook_overlay(ctx, TimeRange::new(Duration::ZERO, HOOK)));
    let lens = split_even(TOTAL - HOOK, steps.len() as u32, Duration::ZERO);
    let mut at = HOOK;
    for (text, len) in steps.into_iter().zip(lens) {
        overlays.push(Overlay::new(
            OverlayKind::StepText,
            TimeRange::new(at, len),
            move |cfg| factory::step_text(&text, cfg),
        ));
        at += len;
    }

    Ok(RenderPlan {
        template,
        items,
        overlays,
        audio: None,
        output_duration,
    })
}
