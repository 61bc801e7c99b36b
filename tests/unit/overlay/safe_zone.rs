use super::*;
use crate::overlay::layer::{Appear, Motion, Node, NodeContent, OverlayKind, Shape};

fn rect_node(rect: Rect, appear: Appear) -> Node {
    Node::new(
        NodeContent::Shape {
            shape: Shape::RoundedRect { rect, radius: 0.0 },
            fill: [255; 4],
        },
        Motion::appear(appear),
    )
}

#[test]
fn layer_inside_safe_rect_passes() {
    let cfg = RenderConfig::default();
    let mut layer = Layer::new(OverlayKind::Cta);
    layer.push(rect_node(Rect::new(100.0, 300.0, 900.0, 500.0), Appear::Fade));
    validate(&layer, &cfg).unwrap();
}

#[test]
fn crossing_bottom_inset_fails_fast() {
    let cfg = RenderConfig::default();
    let mut layer = Layer::new(OverlayKind::Cta);
    layer.push(rect_node(Rect::new(100.0, 1600.0, 900.0, 1740.0), Appear::Fade));
    let err = validate(&layer, &cfg).unwrap_err();
    match err {
        ReelError::SafeZoneViolation { overlay, detail } => {
            assert_eq!(overlay, "cta");
            assert!(detail.contains("bottom"), "{detail}");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn rotation_is_included_in_the_frame() {
    let cfg = RenderConfig::default();
    let mut layer = Layer::new(OverlayKind::TagCluster);
    let r = Rect::new(80.0, 400.0, 1000.0, 480.0);
    layer.push(rect_node(r, Appear::Instant));
    validate(&layer, &cfg).unwrap();

    let mut rotated = Layer::new(OverlayKind::TagCluster);
    rotated.push(rect_node(r, Appear::Instant).rotated(10.0, r.center()));
    assert!(validate(&rotated, &cfg).is_err());
}

#[test]
fn rise_start_offset_is_included() {
    let cfg = RenderConfig::default();
    let mut layer = Layer::new(OverlayKind::StepText);
    layer.push(rect_node(
        Rect::new(100.0, 1600.0, 900.0, 1700.0),
        Appear::Rise { distance: 40.0 },
    ));
    assert!(validate(&layer, &cfg).is_err());
}

#[test]
fn pop_overshoot_is_included() {
    let cfg = RenderConfig::default();
    assert!(pop_peak_scale(&cfg) > 1.0);
    let mut layer = Layer::new(OverlayKind::HeroHook);
    layer.push(rect_node(Rect::new(72.0, 192.0, 1008.0, 400.0), Appear::Pop));
    assert!(validate(&layer, &cfg).is_err());
}
