use super::*;

fn repeat_px(px: [u8; 4], n: usize) -> Vec<u8> {
    px.repeat(n)
}

#[test]
fn opaque_over_replaces() {
    let mut dst = repeat_px([10, 20, 30, 255], 3);
    let src = repeat_px([200, 100, 0, 255], 3);
    over_in_place(&mut dst, &src, 1.0).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn zero_opacity_is_noop() {
    let mut dst = repeat_px([10, 20, 30, 255], 2);
    let before = dst.clone();
    over_in_place(&mut dst, &repeat_px([255, 255, 255, 255], 2), 0.0).unwrap();
    assert_eq!(dst, before);
}

#[test]
fn half_opacity_mixes() {
    let mut dst = repeat_px([0, 0, 0, 255], 1);
    over_in_place(&mut dst, &repeat_px([255, 255, 255, 255], 1), 0.5).unwrap();
    assert!((126..=130).contains(&dst[0]));
    assert_eq!(dst[3], 255);
}

#[test]
fn crossfade_endpoints_match_inputs() {
    let a = repeat_px([200, 10, 10, 255], 4);
    let b = repeat_px([10, 10, 200, 255], 4);

    let mut start = repeat_px([0, 0, 0, 255], 4);
    crossfade_over_in_place(&mut start, &a, &b, 0.0).unwrap();
    assert_eq!(start, a);

    let mut end = repeat_px([0, 0, 0, 255], 4);
    crossfade_over_in_place(&mut end, &a, &b, 1.0).unwrap();
    assert_eq!(end, b);
}

#[test]
fn mismatched_lengths_are_rejected() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 1.0).is_err());
}
