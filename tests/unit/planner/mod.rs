use super::*;
use crate::assets::decode::StillImage;
use crate::foundation::core::Rgba8Premul;
use crate::model::recipe::RecipeStep;
use crate::overlay::factory;
use crate::overlay::layer::OverlayKind;

fn still(v: u8) -> StillImage {
    StillImage::solid(9, 16, Rgba8Premul::from_straight_rgba(v, v, v, 255)).unwrap()
}

fn recipe() -> Recipe {
    let mut r = Recipe::titled("Garlic Noodles");
    r.time_minutes = Some(12);
    r.cost_dollars = Some(4.5);
    r.ingredients = vec!["noodles".into(), "garlic".into(), "butter".into()];
    r.steps = vec![
        RecipeStep::new("Boil the noodles"),
        RecipeStep::new("Fry garlic in butter"),
        RecipeStep::new("Toss and serve"),
    ];
    r
}

fn full_media() -> MediaBundle {
    MediaBundle {
        before: Some(still(20)),
        after: Some(still(120)),
        plated_meal: Some(still(220)),
        ..MediaBundle::default()
    }
}

#[test]
fn template_names_round_trip_through_from_str() {
    for t in Template::ALL {
        assert_eq!(t.as_str().parse::<Template>().unwrap(), t);
        assert_eq!(t.to_string(), t.as_str());
    }
    assert!("slideshow".parse::<Template>().is_err());
}

#[test]
fn every_template_plans_to_its_nominal_duration() {
    let cfg = RenderConfig::default();
    for t in Template::ALL {
        let plan = plan(t, &recipe(), &full_media(), &cfg).unwrap();
        assert_eq!(plan.template, t);
        assert_eq!(plan.output_duration, t.nominal_duration(), "{t}");
        assert_eq!(
            plan.output_duration,
            plan.item_duration_sum() - plan.overlap_sum()
        );
        assert!(plan.max_concurrent_animations(&cfg).unwrap() <= cfg.animation.max_concurrent);
    }
}

#[test]
fn missing_required_media_is_reported_by_field() {
    let media = MediaBundle {
        before: Some(still(20)),
        ..MediaBundle::default()
    };
    let err = plan(Template::SplitScreenSwipe, &recipe(), &media, &RenderConfig::default())
        .unwrap_err();
    match err {
        ReelError::MissingMedia { template, field } => {
            assert_eq!(template, "split_screen_swipe");
            assert_eq!(field, "after");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn template_longer_than_the_maximum_is_rejected() {
    let cfg = RenderConfig {
        max_duration_ms: 10_000,
        ..RenderConfig::default()
    };
    let err = plan(Template::KineticSteps, &recipe(), &full_media(), &cfg).unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
    assert!(plan(Template::SplitScreenSwipe, &recipe(), &full_media(), &cfg).is_ok());
}

#[test]
fn music_is_carried_into_the_plan() {
    let mut media = full_media();
    media.music = Some(crate::model::media::AudioRef {
        path: "track.m4a".into(),
    });
    let plan = plan(Template::BeatSyncedCarousel, &recipe(), &media, &RenderConfig::default())
        .unwrap();
    assert_eq!(plan.audio, media.music);
}

fn hook_at(start: f64, len: f64) -> Overlay {
    Overlay::new(
        OverlayKind::HeroHook,
        TimeRange::new(secs(start), secs(len)),
        |cfg| factory::hero_hook("Dinner", cfg),
    )
}

#[test]
fn budget_delays_a_third_simultaneous_entrance() {
    let cfg = RenderConfig::default();
    let mut overlays = vec![hook_at(0.0, 4.0), hook_at(0.0, 4.0), hook_at(0.0, 5.0)];
    enforce_animation_budget(&mut overlays, &cfg).unwrap();
    assert_eq!(overlays[0].start, Duration::ZERO);
    assert_eq!(overlays[1].start, Duration::ZERO);
    assert!(overlays[2].start > Duration::ZERO);
    assert_eq!(overlays[2].window().end(), secs(5.0));

    let windows: Vec<TimeRange> = overlays
        .iter()
        .flat_map(|o| {
            let layer = o.build_layer(&cfg).unwrap();
            animation_windows(&layer, o.window(), &cfg.animation)
        })
        .collect();
    assert!(max_overlap(&windows) <= cfg.animation.max_concurrent);
}

#[test]
fn budget_fails_when_delay_cannot_help() {
    let cfg = RenderConfig::default();
    let mut overlays = vec![hook_at(0.0, 4.0), hook_at(0.0, 4.0), hook_at(0.0, 0.3)];
    assert!(enforce_animation_budget(&mut overlays, &cfg).is_err());
}

#[test]
fn budget_leaves_sequential_overlays_alone() {
    let cfg = RenderConfig::default();
    let mut overlays = vec![hook_at(0.0, 2.0), hook_at(2.0, 2.0), hook_at(4.0, 2.0)];
    enforce_animation_budget(&mut overlays, &cfg).unwrap();
    let starts: Vec<Duration> = overlays.iter().map(|o| o.start).collect();
    assert_eq!(starts, vec![secs(0.0), secs(2.0), secs(4.0)]);
}
