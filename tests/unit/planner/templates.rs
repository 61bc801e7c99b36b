use super::*;
use crate::foundation::core::Rgba8Premul;
use crate::model::config::RenderConfig;
use crate::model::media::MediaBundle;
use crate::model::recipe::Recipe;
use crate::planner::beat::FixedIntervalBeats;

fn still(v: u8) -> StillImage {
    StillImage::solid(4, 4, Rgba8Premul::from_straight_rgba(v, v, v, 255)).unwrap()
}

fn with_ctx<R>(recipe: &Recipe, media: &MediaBundle, f: impl FnOnce(&PlanCtx<'_>) -> R) -> R {
    let cfg = RenderConfig::default();
    let beats = FixedIntervalBeats::default();
    let ctx = PlanCtx {
        recipe,
        media,
        cfg: &cfg,
        beats: &beats,
    };
    f(&ctx)
}

#[test]
fn only_after_gets_color_pop() {
    assert_eq!(still_chain(MediaField::After).effects().len(), 1);
    assert!(still_chain(MediaField::Before).is_empty());
    assert!(still_chain(MediaField::PlatedMeal).is_empty());
}

#[test]
fn still_segments_pan_in_alternating_directions() {
    let bg = Background::Still(MediaField::Before, still(10));
    let (_, even) = bg.segment(0);
    let (_, odd) = bg.segment(1);
    assert_eq!(even.effects().len(), 1);
    assert_ne!(even.effects()[0], odd.effects()[0]);
}

#[test]
fn clips_are_ignored_without_enough_ingredients() {
    let media = MediaBundle {
        before: Some(still(10)),
        clips: vec![ClipRef::new("a.mp4")],
        ..MediaBundle::default()
    };
    let recipe = Recipe::titled("Toast");
    with_ctx(&recipe, &media, |ctx| {
        assert!(clip_backgrounds(ctx).is_none());
        let bgs = backgrounds(ctx, &[MediaField::After, MediaField::Before]);
        assert_eq!(bgs.len(), 1);
        assert!(matches!(bgs[0], Background::Still(MediaField::Before, _)));
    });
}

#[test]
fn hero_prefers_plated_then_after() {
    let recipe = Recipe::titled("Toast");
    let media = MediaBundle {
        before: Some(still(10)),
        after: Some(still(20)),
        ..MediaBundle::default()
    };
    with_ctx(&recipe, &media, |ctx| {
        assert!(matches!(hero(ctx).unwrap(), Background::Still(MediaField::After, _)));
        let err = required_still(ctx, Template::SplitScreenSwipe, MediaField::PlatedMeal)
            .unwrap_err();
        assert!(matches!(err, ReelError::MissingMedia { .. }));
    });
}
