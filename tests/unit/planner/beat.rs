use super::*;
use crate::foundation::core::secs;

fn body() -> TimeRange {
    TimeRange::between(secs(2.0), secs(8.0))
}

#[test]
fn fixed_grid_respects_min_segment() {
    let cuts = cut_points(&FixedIntervalBeats::default(), body(), None);
    assert_eq!(cuts, vec![secs(3.5), secs(5.0), secs(6.5)]);
    let segs = segments(body(), &cuts);
    assert_eq!(segs.len(), 4);
    assert!(segs.iter().all(|s| s.duration >= MIN_SEGMENT));
    assert_eq!(segs.iter().map(|s| s.duration).sum::<Duration>(), secs(6.0));
}

#[test]
fn explicit_beats_are_filtered_to_the_window() {
    let beats = ExplicitBeats {
        times: vec![secs(1.0), secs(3.3), secs(3.4), secs(5.0), secs(6.9), secs(9.0)],
    };
    let cuts = cut_points(&beats, body(), None);
    assert_eq!(cuts, vec![secs(3.3), secs(5.0)]);
}

#[test]
fn sparse_beats_fall_back_to_fixed_interval() {
    let beats = ExplicitBeats {
        times: vec![secs(4.0)],
    };
    assert_eq!(
        cut_points(&beats, body(), None),
        cut_points(&FixedIntervalBeats::default(), body(), None)
    );
}

#[test]
fn segments_without_cuts_cover_the_window() {
    assert_eq!(segments(body(), &[]), vec![body()]);
}
