use super::*;

#[test]
fn default_damping_is_underdamped() {
    let s = Spring::with_damping(13.0);
    assert!((s.zeta() - 0.65).abs() < 1e-12);
    assert_eq!(s.value(0.0), 0.0);
    assert!(s.peak() > 1.0 && s.peak() < 1.1);
}

#[test]
fn settles_within_tolerance_after_settle_time() {
    for damping in [12.0, 13.0, 14.0, 25.0] {
        let s = Spring::with_damping(damping);
        let settle = s.settle_time().as_secs_f64();
        assert!(settle > 0.2 && settle < 2.0, "damping {damping}: {settle}");
        for i in 0..50 {
            let t = settle + f64::from(i) * 0.02;
            assert!((s.value(t) - 1.0).abs() <= SETTLE_TOLERANCE + 1e-9);
        }
    }
}

#[test]
fn never_exceeds_peak() {
    let s = Spring::with_damping(12.0);
    for i in 0..400 {
        assert!(s.value(f64::from(i) * 0.005) <= s.peak() + 1e-9);
    }
}
