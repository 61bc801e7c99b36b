use super::*;
use crate::foundation::core::Rect;
use crate::overlay::layer::{Node, NodeContent, OverlayKind, Shape};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn plate(motion: Motion) -> Node {
    Node::new(
        NodeContent::Shape {
            shape: Shape::RoundedRect {
                rect: Rect::new(100.0, 300.0, 400.0, 400.0),
                radius: 8.0,
            },
            fill: [255, 255, 255, 255],
        },
        motion,
    )
}

#[test]
fn clock_is_local_to_the_overlay() {
    let timing = AnimationTiming::default();
    let m = Motion::appear(Appear::Fade);
    let a = node_state(&m, ms(100), ms(3000), true, &timing);
    assert!(a.opacity > 0.0 && a.opacity < 1.0);
    let b = node_state(&m, ms(250), ms(3000), true, &timing);
    assert_eq!(b.opacity, 1.0);
}

#[test]
fn delay_hides_node_until_it_elapses() {
    let timing = AnimationTiming::default();
    let m = Motion::appear(Appear::Pop).delayed(ms(270));
    assert!(node_state(&m, ms(200), ms(3000), true, &timing).is_hidden());
    let s = node_state(&m, ms(280), ms(3000), true, &timing);
    assert!(!s.is_hidden());
    assert!(s.scale < 1.0 && s.scale >= timing.pop_from_scale);
}

#[test]
fn pop_settles_at_full_scale() {
    let timing = AnimationTiming::default();
    let m = Motion::appear(Appear::Pop);
    let s = node_state(&m, ms(2000), ms(3000), true, &timing);
    assert!((s.scale - 1.0).abs() < 0.005);
}

#[test]
fn rise_starts_below_and_lands() {
    let timing = AnimationTiming::default();
    let m = Motion::appear(Appear::Rise { distance: 40.0 });
    let s0 = node_state(&m, Duration::ZERO, ms(3000), true, &timing);
    assert_eq!(s0.offset.y, 40.0);
    let s1 = node_state(&m, ms(600), ms(3000), true, &timing);
    assert_eq!(s1.offset.y, 0.0);
}

#[test]
fn exit_fade_reaches_zero_at_window_end() {
    let timing = AnimationTiming::default();
    let m = Motion::appear(Appear::Instant);
    let mid = node_state(&m, ms(2875), ms(3000), true, &timing);
    assert!((mid.opacity - 0.5).abs() < 1e-9);
    assert!(node_state(&m, ms(3000), ms(3000), true, &timing).is_hidden());
    let kept = node_state(&m, ms(2999), ms(3000), false, &timing);
    assert_eq!(kept.opacity, 1.0);
}

#[test]
fn tween_progress_runs_after_delay() {
    let timing = AnimationTiming::default();
    let m = Motion::appear(Appear::Instant)
        .delayed(ms(500))
        .with_tween(ms(1000), Ease::Linear);
    let s = node_state(&m, ms(1000), ms(4000), true, &timing);
    assert!((s.progress - 0.5).abs() < 1e-9);
    assert_eq!(entrance_end(&m, &timing), ms(1500));
}

#[test]
fn windows_cover_entrance_and_exit() {
    let timing = AnimationTiming::default();
    let mut layer = Layer::new(OverlayKind::HeroHook);
    layer.push(plate(Motion::appear(Appear::Fade)));
    layer.push(plate(Motion::appear(Appear::Fade).delayed(ms(135))));
    let w = animation_windows(&layer, TimeRange::new(ms(1000), ms(3000)), &timing);
    assert_eq!(
        w,
        vec![
            TimeRange::between(ms(1000), ms(1385)),
            TimeRange::between(ms(3750), ms(4000)),
        ]
    );
}

#[test]
fn static_layer_without_fade_has_no_windows() {
    let timing = AnimationTiming::default();
    let mut layer = Layer::new(OverlayKind::PipPlaceholder);
    layer.fade_out = false;
    layer.push(plate(Motion::appear(Appear::Instant)));
    assert!(animation_windows(&layer, TimeRange::new(ms(0), ms(3000)), &timing).is_empty());
}
