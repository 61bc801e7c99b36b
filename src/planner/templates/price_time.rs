//! Time and cost stickers, a progress bar challenge, then the after reveal.

use std::time::Duration;

use crate::foundation::core::TimeRange;
use crate::foundation::error::{ReelError, ReelResult};
use crate::model::media::MediaField;
use crate::model::plan::{Overlay, RenderPlan, TrackSource, Transition};
use crate::model::recipe::Recipe;
use crate::overlay::factory::{self, Badge};
use crate::overlay::layer::OverlayKind;
use crate::overlay::stickers::StickerIcon;
use crate::planner::templates::{
    backgrounds, crossfade, cta_overlay, required_still, still_chain,
};
use crate::planner::text::DEFAULT_MINUTES;
use crate::planner::timeline::Timeline;
use crate::planner::{PlanCtx, Template};

const TOTAL: Duration = Duration::from_secs(12);
const OPENING: Duration = Duration::from_millis(1500);
const CHALLENGE: Duration = Duration::from_secs(8);
const STICKERS: TimeRange = TimeRange::new(Duration::ZERO, Duration::from_secs(3));
const PROGRESS: TimeRange = TimeRange::new(Duration::from_secs(1), CHALLENGE);
const CTA: TimeRange = TimeRange::new(Duration::from_secs(9), Duration::from_secs(3));

pub(crate) fn plan(ctx: &PlanCtx<'_>) -> ReelResult<RenderPlan> {
    let template = Template::PriceTimeChallenge;
    let before = required_still(ctx, template, MediaField::Before)?;
    let after = required_still(ctx, template, MediaField::After)?;
    let fade = crossfade(ctx);

    let mut tl = Timeline::new();
    tl.push(
        TrackSource::Still(before),
        OPENING,
        Transition::Cut,
        still_chain(MediaField::Before),
    )?;
    let bg = backgrounds(ctx, &[MediaField::PlatedMeal, MediaField::Before])
        .into_iter()
        .next()
        .ok_or_else(|| ReelError::missing_media(template, MediaField::Before))?;
    let (source, effects) = bg.segment(1);
    tl.push(source, CHALLENGE + fade.overlap(), fade, effects)?;
    let after_len = TOTAL - (tl.cursor() - fade.overlap());
    tl.push(
        TrackSource::Still(after),
        after_len,
        fade,
        still_chain(MediaField::After),
    )?;
    let (items, output_duration) = tl.finish();

    let minutes = ctx.recipe.time_minutes.unwrap_or(DEFAULT_MINUTES);
    let badges = challenge_badges(ctx.recipe);
    let label = format!("{minutes} MIN CHALLENGE");
    let overlays = vec![
        Overlay::new(OverlayKind::StickerStack, STICKERS, move |cfg| {
            factory::sticker_stack(&badges, cfg)
        }),
        Overlay::new(OverlayKind::ProgressBar, PROGRESS, move |cfg| {
            factory::progress_bar(&label, CHALLENGE, cfg)
        }),
        cta_overlay(ctx, CTA),
    ];

    Ok(RenderPlan {
        template,
        items,
        overlays,
        audio: None,
        output_duration,
    })
}

/// Time, cost and challenge badges, top to bottom.
pub(crate) fn challenge_badges(recipe: &Recipe) -> Vec<Badge> {
    let minutes = recipe.time_minutes.unwrap_or(DEFAULT_MINUTES);
    vec![
        Badge {
            icon: StickerIcon::Clock,
            text: format!("{minutes} MIN"),
        },
        Badge {
            icon: StickerIcon::Coin,
            text: recipe.cost_label(),
        },
        Badge {
            icon: StickerIcon::Sparkle,
            text: "CHALLENGE".to_string(),
        },
    ]
}
