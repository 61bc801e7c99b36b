use super::*;

const ALL: [Ease; 5] = [
    Ease::Linear,
    Ease::OutQuad,
    Ease::OutCubic,
    Ease::InOutCubic,
    Ease::InOutSine,
];

#[test]
fn endpoints_are_fixed() {
    for e in ALL {
        assert!(e.apply(0.0).abs() < 1e-12, "{e:?}");
        assert!((e.apply(1.0) - 1.0).abs() < 1e-12, "{e:?}");
    }
}

#[test]
fn input_is_clamped() {
    for e in ALL {
        assert_eq!(e.apply(-3.0), e.apply(0.0));
        assert_eq!(e.apply(7.0), e.apply(1.0));
    }
}

#[test]
fn curves_are_monotonic() {
    for e in ALL {
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = e.apply(f64::from(i) / 100.0);
            assert!(v >= prev, "{e:?} decreased at {i}");
            prev = v;
        }
    }
}

#[test]
fn lerp_hits_both_ends() {
    assert_eq!(lerp(0.6, 1.0, 0.0), 0.6);
    assert_eq!(lerp(0.6, 1.0, 1.0), 1.0);
}
