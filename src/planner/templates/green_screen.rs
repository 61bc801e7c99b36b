//! Presenter placeholder over before, b-roll and after.

use std::time::Duration;

use crate::foundation::core::TimeRange;
use crate::foundation::error::{ReelError, ReelResult};
use crate::model::media::MediaField;
use crate::model::plan::{Overlay, RenderPlan, TrackSource, Transition};
use crate::overlay::factory;
use crate::overlay::layer::OverlayKind;
use crate::planner::templates::{
    backgrounds, crossfade, cta_overlay, hook_overlay, required_still, still_chain,
};
use crate::planner::text::callouts;
use crate::planner::timeline::{Timeline, split_even};
use crate::planner::{PlanCtx, Template};

const TOTAL: Duration = Duration::from_secs(15);
const INTRO: Duration = Duration::from_secs(3);
const BROLL: Duration = Duration::from_secs(6);
const CTA: Duration = Duration::from_secs(3);

pub(crate) fn plan(ctx: &PlanCtx<'_>) -> ReelResult<RenderPlan> {
    let template = Template::GreenScreenPip;
    let before = required_still(ctx, template, MediaField::Before)?;
    let after = required_still(ctx, template, MediaField::After)?;
    let fade = crossfade(ctx);

    let mut tl = Timeline::new();
    tl.push(
        TrackSource::Still(before),
        INTRO + fade.overlap(),
        Transition::Cut,
        still_chain(MediaField::Before),
    )?;
    let broll = backgrounds(ctx, &[MediaField::PlatedMeal, MediaField::Before])
        .into_iter()
        .next()
        .ok_or_else(|| ReelError::missing_media(template, MediaField::Before))?;
    let (source, effects) = broll.segment(1);
    tl.push(source, BROLL + fade.overlap(), fade, effects)?;
    let after_len = TOTAL - (tl.cursor() - fade.overlap());
    tl.push(
        TrackSource::Still(after),
        after_len,
        fade,
        still_chain(MediaField::After),
    )?;
    let (items, output_duration) = tl.finish();

    let mut overlays = vec![
        Overlay::new(
            OverlayKind::PipPlaceholder,
            TimeRange::new(Duration::ZERO, TOTAL),
            factory::pip_placeholder,
        ),
        hook_overlay(ctx, TimeRange::new(Duration::ZERO, INTRO)),
    ];
    let tags = callouts(ctx.recipe);
    let mut at = INTRO;
    for (tag, len) in tags
        .iter()
        .cloned()
        .zip(split_even(BROLL, tags.len() as u32, Duration::ZERO))
    {
        overlays.push(Overlay::new(
            OverlayKind::IngredientCallout,
            TimeRange::new(at, len),
            move |cfg| factory::ingredient_callout(&tag, cfg),
        ));
        at += len;
    }
    overlays.push(cta_overlay(ctx, TimeRange::new(TOTAL - CTA, CTA)));

    Ok(RenderPlan {
        template,
        items,
        overlays,
        audio: None,
        output_duration,
    })
}
