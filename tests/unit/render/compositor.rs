use super::*;
use crate::assets::decode::StillImage;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::{Rgba8Premul, secs};
use crate::model::plan::TrackItem;
use crate::planner::Template;

fn cfg() -> RenderConfig {
    RenderConfig {
        canvas: Canvas::new(18, 32).unwrap(),
        fps: Fps::new(10, 1).unwrap(),
        ..RenderConfig::default()
    }
}

fn solid(r: u8, g: u8, b: u8) -> StillImage {
    StillImage::solid(3, 3, Rgba8Premul::from_straight_rgba(r, g, b, 255)).unwrap()
}

fn plan(transition: Transition) -> RenderPlan {
    RenderPlan {
        template: Template::SplitScreenSwipe,
        items: vec![
            TrackItem::still(solid(250, 0, 0), TimeRange::new(Duration::ZERO, secs(1.0))),
            TrackItem::still(solid(0, 0, 250), TimeRange::new(secs(0.5), secs(1.0)))
                .with_transition(transition),
        ],
        overlays: Vec::new(),
        audio: None,
        output_duration: secs(1.5),
    }
}

#[test]
fn crossfade_endpoints_match_the_neighbouring_items() {
    let mut c = Compositor::new(plan(Transition::Crossfade(secs(0.5))), &cfg()).unwrap();
    let outgoing = c.render_frame(FrameIndex(0)).unwrap();
    let start = c.render_frame(FrameIndex(5)).unwrap();
    let mid = c.render_frame(FrameIndex(7)).unwrap();
    let after = c.render_frame(FrameIndex(10)).unwrap();
    let incoming = c.render_frame(FrameIndex(14)).unwrap();

    assert_eq!(start.data, outgoing.data);
    assert_eq!(after.data, incoming.data);
    let px = mid.pixel(9, 16);
    assert!(px[0] > 0 && px[2] > 0, "mid crossfade should mix both: {px:?}");
    assert_eq!(px[3], 255);
}

#[test]
fn reveal_draws_incoming_over_outgoing() {
    let mut c = Compositor::new(plan(Transition::Reveal(secs(0.5))), &cfg()).unwrap();
    let px = c.render_frame(FrameIndex(6)).unwrap().pixel(9, 16);
    assert_eq!(px[2], 250);
    assert_eq!(px[0], 0);
}

#[test]
fn render_pushes_every_frame_in_order() {
    let c = Compositor::new(plan(Transition::Crossfade(secs(0.5))), &cfg()).unwrap();
    let mut sink = InMemorySink::new();
    let stats = c.render(&mut sink, &CancelToken::new()).unwrap();

    assert_eq!(stats.frames, 15);
    assert!(sink.is_finished());
    let frames = sink.frames();
    assert_eq!(frames.len(), 15);
    assert!(frames.windows(2).all(|w| w[0].0 < w[1].0));
    assert!(frames.iter().all(|(_, f)| f.premultiplied && f.width == 18));
    assert!(stats.buffer_allocs <= 4, "allocs: {}", stats.buffer_allocs);
}

#[test]
fn cancelled_render_stops_before_the_first_frame() {
    let c = Compositor::new(plan(Transition::Crossfade(secs(0.5))), &cfg()).unwrap();
    let cancel = CancelToken::new();
    cancel.cancel();
    let mut sink = InMemorySink::new();
    let err = c.render(&mut sink, &cancel).unwrap_err();
    assert!(matches!(err, ReelError::Cancelled));
    assert!(sink.frames().is_empty());
    assert!(!sink.is_finished());
}

#[test]
fn frames_past_the_end_are_rejected() {
    let mut c = Compositor::new(plan(Transition::Crossfade(secs(0.5))), &cfg()).unwrap();
    assert!(c.render_frame(FrameIndex(15)).is_err());
}
