//! Before, circular reveal of after, counters, CTA end card.

use std::time::Duration;

use crate::effects::fx::Effect;
use crate::foundation::core::{Point, TimeRange};
use crate::foundation::error::ReelResult;
use crate::model::media::MediaField;
use crate::model::plan::{Overlay, RenderPlan, TrackSource, Transition};
use crate::model::recipe::Recipe;
use crate::overlay::factory::{self, CounterItem};
use crate::overlay::layer::OverlayKind;
use crate::overlay::stickers::StickerIcon;
use crate::planner::templates::{
    crossfade, cta_overlay, hook_overlay, required_still, still_chain,
};
use crate::planner::timeline::Timeline;
use crate::planner::{PlanCtx, Template};

const BEFORE_ALONE: Duration = Duration::from_millis(1500);
const REVEAL: Duration = Duration::from_millis(1500);
const COUNTERS: Duration = Duration::from_secs(4);
const END_CARD: Duration = Duration::from_secs(2);

pub(crate) fn plan(ctx: &PlanCtx<'_>) -> ReelResult<RenderPlan> {
    let template = Template::SplitScreenSwipe;
    let before = required_still(ctx, template, MediaField::Before)?;
    let after = required_still(ctx, template, MediaField::After)?;
    let plated = required_still(ctx, template, MediaField::PlatedMeal)?;
    let fade = crossfade(ctx);

    let reveal_start = BEFORE_ALONE;
    let counters_start = reveal_start + REVEAL;
    let end_card_start = counters_start + COUNTERS;
    let after_len = REVEAL + COUNTERS + fade.overlap();
    let reveal_until = REVEAL.as_secs_f64() / after_len.as_secs_f64();

    let mut tl = Timeline::new();
    tl.push(
        TrackSource::Still(before),
        BEFORE_ALONE + REVEAL,
        Transition::Cut,
        still_chain(MediaField::Before),
    )?;
    // Wipe grows from the bottom-left corner and is fully open when the reveal ends.
    let wipe = Effect::circular_wipe(Point::new(0.0, 1.0), reveal_until);
    tl.push(
        TrackSource::Still(after),
        after_len,
        Transition::Reveal(REVEAL),
        still_chain(MediaField::After).with(wipe),
    )?;
    tl.push(
        TrackSource::Still(plated),
        END_CARD,
        fade,
        still_chain(MediaField::PlatedMeal),
    )?;
    let (items, output_duration) = tl.finish();

    let mut overlays = vec![hook_overlay(ctx, TimeRange::new(Duration::ZERO, reveal_start))];
    let rows = counter_rows(ctx.recipe);
    if !rows.is_empty() {
        overlays.push(Overlay::new(
            OverlayKind::Counters,
            TimeRange::new(counters_start, COUNTERS),
            move |cfg| factory::counters(&rows, cfg),
        ));
    }
    overlays.push(cta_overlay(ctx, TimeRange::new(end_card_start, END_CARD)));

    Ok(RenderPlan {
        template,
        items,
        overlays,
        audio: None,
        output_duration,
    })
}

/// Ingredient count, minutes, cost and calories, each only when known.
pub(crate) fn counter_rows(recipe: &Recipe) -> Vec<CounterItem> {
    let row = |value: f64, prefix: &str, suffix: &str, decimals: usize, icon: StickerIcon| {
        CounterItem {
            value,
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            decimals,
            icon,
        }
    };
    let mut out = Vec::with_capacity(4);
    let n = recipe.ingredients.iter().filter(|i| !i.trim().is_empty()).count();
    if n > 0 {
        let suffix = if n == 1 { " ingredient" } else { " ingredients" };
        out.push(row(n as f64, "", suffix, 0, StickerIcon::Leaf));
    }
    if let Some(m) = recipe.time_minutes {
        out.push(row(f64::from(m), "", " min", 0, StickerIcon::Clock));
    }
    if let Some(c) = recipe.cost_dollars {
        let decimals = if c.fract() == 0.0 { 0 } else { 2 };
        out.push(row(c, "$", "", decimals, StickerIcon::Coin));
    }
    if let Some(cal) = recipe.calories {
        out.push(row(f64::from(cal), "", " cal", 0, StickerIcon::Flame));
    }
    out
}
