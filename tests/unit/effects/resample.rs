use super::*;

fn gradient(w: u32, h: u32) -> Raster {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for _y in 0..h {
        for x in 0..w {
            data.extend_from_slice(&[(x * 255 / (w - 1)) as u8, 0, 0, 255]);
        }
    }
    Raster::from_premul(w, h, data).unwrap()
}

#[test]
fn pan_window_never_leaves_the_raster() {
    for dir in [PanDirection::Right, PanDirection::Left] {
        for i in 0..=20 {
            let p = f64::from(i) / 20.0;
            let scale = 1.0 + 0.08 * p;
            let w = pan_zoom_window(1080, 1920, scale, dir, p);
            assert!(w.x0 >= -1e-9 && w.y0 >= -1e-9);
            assert!(w.x1 <= 1080.0 + 1e-9 && w.y1 <= 1920.0 + 1e-9);
        }
    }
}

#[test]
fn pan_direction_alternates_by_index() {
    assert_eq!(PanDirection::for_index(0), PanDirection::Right);
    assert_eq!(PanDirection::for_index(1), PanDirection::Left);
    let right = pan_zoom_window(100, 100, 1.08, PanDirection::Right, 1.0);
    let left = pan_zoom_window(100, 100, 1.08, PanDirection::Left, 1.0);
    assert!(right.x0 > left.x0);
    assert!((right.x1 - 100.0).abs() < 1e-9);
    assert!(left.x0.abs() < 1e-9);
}

#[test]
fn unit_scale_is_identity() {
    let r = gradient(8, 4);
    assert_eq!(pan_zoom(&r, 1.0, PanDirection::Right, 0.0).unwrap(), r);
}

#[test]
fn zoom_keeps_pixels_opaque() {
    let r = gradient(16, 16);
    let z = pan_zoom(&r, 1.08, PanDirection::Left, 0.7).unwrap();
    assert!(z.data.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn cover_fills_the_canvas() {
    let r = gradient(20, 10);
    let out = fit_to(&r.data, 20, 10, 9, 16, Fit::Cover).unwrap();
    assert!(out.matches_extent(9, 16));
    assert!(out.data.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn contain_letterboxes() {
    let r = Raster::filled(20, 10, [9, 9, 9, 255]).unwrap();
    let out = fit_to(&r.data, 20, 10, 10, 20, Fit::Contain).unwrap();
    assert_eq!(out.pixel(5, 0), [0, 0, 0, 0]);
    assert_eq!(out.pixel(5, 10), [9, 9, 9, 255]);
}
