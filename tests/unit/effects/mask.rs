use super::*;

#[test]
fn corner_origin_reaches_the_full_diagonal() {
    let d = farthest_corner_distance(Point::new(0.0, 0.0), 30, 40);
    assert!((d - 50.0).abs() < 1e-9);
    let c = farthest_corner_distance(Point::new(15.0, 20.0), 30, 40);
    assert!((c - 25.0).abs() < 1e-9);
}

#[test]
fn radius_completes_at_reveal_fraction() {
    let o = Point::new(0.0, 0.0);
    assert_eq!(wipe_radius(o, 30, 40, 0.0, 0.5), 0.0);
    assert!((wipe_radius(o, 30, 40, 0.25, 0.5) - 25.0).abs() < 1e-9);
    assert!((wipe_radius(o, 30, 40, 0.5, 0.5) - 50.0).abs() < 1e-9);
    assert!((wipe_radius(o, 30, 40, 0.9, 0.5) - 50.0).abs() < 1e-9);
}

#[test]
fn zero_radius_hides_everything() {
    let r = Raster::filled(4, 4, [200, 100, 50, 255]).unwrap();
    let m = circular_mask(&r, Point::new(0.0, 0.0), 0.0);
    assert!(m.data.iter().all(|&b| b == 0));
}

#[test]
fn full_radius_keeps_everything() {
    let r = Raster::filled(4, 4, [200, 100, 50, 255]).unwrap();
    let radius = farthest_corner_distance(Point::new(0.0, 0.0), 4, 4) + 1.0;
    assert_eq!(circular_mask(&r, Point::new(0.0, 0.0), radius), r);
}

#[test]
fn partial_radius_splits_near_and_far() {
    let r = Raster::filled(10, 1, [255, 255, 255, 255]).unwrap();
    let m = circular_mask(&r, Point::new(0.0, 0.5), 5.0);
    assert_eq!(m.pixel(1, 0)[3], 255);
    assert_eq!(m.pixel(8, 0)[3], 0);
}
