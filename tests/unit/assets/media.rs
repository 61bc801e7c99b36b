use super::*;

#[test]
fn source_time_loops_over_clip_length() {
    let d = Some(Duration::from_secs(2));
    assert_eq!(
        clip_source_time(Duration::from_millis(2500), Duration::ZERO, d),
        Duration::from_millis(500)
    );
    assert_eq!(
        clip_source_time(Duration::from_millis(500), Duration::from_secs(1), d),
        Duration::from_millis(1500)
    );
    assert_eq!(
        clip_source_time(Duration::from_secs(7), Duration::ZERO, None),
        Duration::from_secs(7)
    );
}

#[cfg(not(feature = "media-ffmpeg"))]
#[test]
fn probing_requires_the_feature() {
    let err = probe_clip(Path::new("clip.mp4")).unwrap_err();
    assert!(err.to_string().contains("media-ffmpeg"));
}
