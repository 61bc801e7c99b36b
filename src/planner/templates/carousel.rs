//! Blurred-before hook, beat-cut body, CTA over the finished dish.

use std::time::Duration;

use crate::effects::fx::{Effect, EffectChain};
use crate::foundation::core::TimeRange;
use crate::foundation::error::{ReelError, ReelResult};
use crate::model::media::MediaField;
use crate::model::plan::{Overlay, RenderPlan, TrackSource, Transition};
use crate::overlay::factory;
use crate::overlay::layer::OverlayKind;
use crate::planner::beat::{cut_points, segments};
use crate::planner::templates::{
    backgrounds, cta_overlay, hero, hook_overlay, required_still,
};
use crate::planner::text::callouts;
use crate::planner::timeline::Timeline;
use crate::planner::{PlanCtx, Template};

const HOOK: Duration = Duration::from_secs(2);
const BODY: Duration = Duration::from_secs(6);
const CTA: Duration = Duration::from_secs(3);

pub(crate) fn plan(ctx: &PlanCtx<'_>) -> ReelResult<RenderPlan> {
    let template = Template::BeatSyncedCarousel;
    let before = required_still(ctx, template, MediaField::Before)?;
    let blur = ctx.cfg.px(f64::from(ctx.cfg.blur_radius_px)).round() as u32;

    let mut tl = Timeline::new();
    tl.push(
        TrackSource::Still(before),
        HOOK,
        Transition::Cut,
        EffectChain::new().with(Effect::blur(blur)),
    )?;

    let body = TimeRange::new(HOOK, BODY);
    let cuts = cut_points(ctx.beats, body, ctx.media.music.as_ref());
    let sources = backgrounds(
        ctx,
        &[MediaField::After, MediaField::PlatedMeal, MediaField::Before],
    );
    if sources.is_empty() {
        return Err(ReelError::validation("carousel body has no sources"));
    }
    for (i, seg) in segments(body, &cuts).iter().enumerate() {
        let (source, effects) = sources[i % sources.len()].segment(i + 1);
        tl.push(source, seg.duration, Transition::Cut, effects)?;
    }

    let (source, effects) = hero(ctx)?.segment(0);
    let cta_start = tl.cursor();
    tl.push(source, CTA, Transition::Cut, effects)?;
    let (items, output_duration) = tl.finish();

    let mut overlays = vec![hook_overlay(ctx, TimeRange::new(Duration::ZERO, HOOK))];
    let tags = callouts(ctx.recipe);
    if !tags.is_empty() {
        overlays.push(Overlay::new(OverlayKind::TagCluster, body, move |cfg| {
            factory::tag_cluster(&tags, cfg)
        }));
    }
    overlays.push(cta_overlay(ctx, TimeRange::new(cta_start, CTA)));

    Ok(RenderPlan {
        template,
        items,
        overlays,
        audio: None,
        output_duration,
    })
}
