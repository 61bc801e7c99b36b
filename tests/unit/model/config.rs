use super::*;

#[test]
fn defaults_match_reference_layout() {
    let cfg = RenderConfig::default();
    cfg.validate().unwrap();
    let i = cfg.safe_insets();
    assert_eq!(i.top, 192.0);
    assert_eq!(i.bottom, 192.0);
    assert_eq!(i.left, 72.0);
    assert_eq!(i.right, 72.0);
    assert_eq!(cfg.max_duration(), Duration::from_secs(15));
    assert_eq!(cfg.safe_rect(), Rect::new(72.0, 192.0, 1008.0, 1728.0));
}

#[test]
fn insets_scale_with_canvas() {
    let cfg = RenderConfig {
        canvas: Canvas::new(540, 960).unwrap(),
        ..RenderConfig::default()
    };
    let i = cfg.safe_insets();
    assert_eq!(i.top, 96.0);
    assert_eq!(i.left, 36.0);
}

#[test]
fn safe_zone_below_minimum_is_rejected() {
    let mut cfg = RenderConfig::default();
    cfg.safe_zone.vertical_fraction = 0.0;
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("vertical_fraction"));

    let mut cfg = RenderConfig::default();
    cfg.safe_zone.side_margin_px = 0.0;
    let err = cfg.validate().unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
    assert!(err.to_string().contains("side_margin_px"));

    let err = RenderConfig::from_json_str(r#"{"safe_zone":{"vertical_fraction":0.05}}"#);
    assert!(err.is_err());

    let mut cfg = RenderConfig::default();
    cfg.safe_zone.vertical_fraction = 0.2;
    cfg.safe_zone.side_margin_px = 96.0;
    cfg.validate().unwrap();
}

#[test]
fn json_fills_missing_fields_with_defaults() {
    let cfg = RenderConfig::from_json_str(r#"{"fps":{"num":24,"den":1},"cta_seed":9}"#).unwrap();
    assert_eq!(cfg.fps.num, 24);
    assert_eq!(cfg.cta_seed, 9);
    assert_eq!(cfg.canvas, Canvas::default());
    assert_eq!(cfg.typography, Typography::default());
}

#[test]
fn out_of_range_typography_is_rejected() {
    let err = RenderConfig::from_json_str(r#"{"typography":{"hook_pt":80}}"#).unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
    assert!(err.to_string().contains("hook_pt"));
}

#[test]
fn out_of_range_animation_is_rejected() {
    let mut cfg = RenderConfig::default();
    cfg.animation.fade_ms = 500;
    assert!(cfg.validate().is_err());

    let mut cfg = RenderConfig::default();
    cfg.animation.spring_damping = 11.0;
    assert!(cfg.validate().is_err());

    let mut cfg = RenderConfig::default();
    cfg.animation.max_concurrent = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn malformed_json_is_wrapped() {
    let err = RenderConfig::from_json_str("{").unwrap_err();
    assert!(matches!(err, ReelError::Other(_)));
}
