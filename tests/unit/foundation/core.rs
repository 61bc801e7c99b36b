use super::*;

#[test]
fn frame_range_contains_boundaries() {
    let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
    assert!(!r.contains(FrameIndex(1)));
    assert!(r.contains(FrameIndex(2)));
    assert!(r.contains(FrameIndex(4)));
    assert!(!r.contains(FrameIndex(5)));
    assert_eq!(r.len_frames(), 3);
}

#[test]
fn fps_frame_time_is_exact_for_integer_rates() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.frame_time(FrameIndex(45)), Duration::from_millis(1500));
    assert_eq!(fps.frames_in(Duration::from_secs(15)), 450);
    assert_eq!(fps.frames_in(Duration::from_millis(2600)), 78);
}

#[test]
fn fps_rejects_zero() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn canvas_scale_is_relative_to_reference_width() {
    assert_eq!(Canvas::default().scale(), 1.0);
    assert_eq!(Canvas::new(540, 960).unwrap().scale(), 0.5);
    assert!(Canvas::new(0, 10).is_err());
}

#[test]
fn time_range_progress_clamps() {
    let r = TimeRange::new(Duration::from_secs(2), Duration::from_secs(4));
    assert_eq!(r.end(), Duration::from_secs(6));
    assert_eq!(r.progress(Duration::from_secs(1)), 0.0);
    assert_eq!(r.progress(Duration::from_secs(4)), 0.5);
    assert_eq!(r.progress(Duration::from_secs(9)), 1.0);
    assert!(r.contains(Duration::from_secs(2)));
    assert!(!r.contains(Duration::from_secs(6)));
}

#[test]
fn time_ranges_touching_do_not_overlap() {
    let a = TimeRange::between(Duration::ZERO, Duration::from_secs(2));
    let b = TimeRange::between(Duration::from_secs(2), Duration::from_secs(3));
    let c = TimeRange::between(Duration::from_millis(1500), Duration::from_secs(3));
    assert!(!a.overlaps(b));
    assert!(a.overlaps(c));
}

#[test]
fn transform_to_affine_identity_and_translation() {
    let center = Point::new(50.0, 100.0);
    let t = Transform2D::default();
    assert!(t.is_identity());
    assert_eq!(t.to_affine(center) * Point::new(3.0, 4.0), Point::new(3.0, 4.0));

    let t = Transform2D {
        translate: Vec2::new(10.0, -2.5),
        ..Transform2D::default()
    };
    assert_eq!(t.to_affine(center) * Point::new(0.0, 0.0), Point::new(10.0, -2.5));
}

#[test]
fn transform_scale_pivots_on_center() {
    let center = Point::new(50.0, 50.0);
    let t = Transform2D {
        scale: 2.0,
        ..Transform2D::default()
    };
    assert_eq!(t.to_affine(center) * center, center);
}

#[test]
fn premul_from_straight_rounds() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.to_array(), [128, 64, 0, 128]);
}
