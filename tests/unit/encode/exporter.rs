use super::*;

fn params() -> EncodeParams {
    EncodeParams {
        width: 1080,
        height: 1920,
        fps: Fps::default(),
        video_bitrate: 10_000_000,
        audio_bitrate: 160_000,
        audio: None,
        bg_rgba: [0, 0, 0, 255],
    }
}

#[test]
fn defaults_validate() {
    let s = ExportSettings::default();
    s.validate().unwrap();
    assert_eq!(s.soft_limit_bytes, 20_000_000);
    assert_eq!(s.hard_limit_bytes, 50_000_000);
    assert_eq!(s.audio_bitrate, 160_000);
}

#[test]
fn bitrate_spends_soft_budget_within_band() {
    let s = ExportSettings::default();
    // 20MB over 15s is ~10.67 Mbps, minus audio.
    assert_eq!(
        s.video_bitrate_for(Duration::from_secs(15), true),
        10_666_666 - 160_000
    );
    assert_eq!(s.video_bitrate_for(Duration::from_secs(15), false), 10_666_666);
    assert_eq!(s.video_bitrate_for(Duration::from_secs(60), true), 8_000_000);
    assert_eq!(s.video_bitrate_for(Duration::from_secs(9), false), 12_000_000);
}

#[test]
fn downgrade_scales_bitrate_and_keeps_even_dimensions() {
    let d = params().downgraded(&ExportSettings::default());
    assert_eq!((d.width, d.height), (810, 1440));
    assert_eq!(d.video_bitrate, 6_000_000);
    assert_eq!(d.audio_bitrate, 160_000);
    d.validate().unwrap();

    let odd = EncodeParams {
        width: 108,
        height: 190,
        ..params()
    }
    .downgraded(&ExportSettings::default());
    assert!(odd.width.is_multiple_of(2) && odd.height.is_multiple_of(2));
    assert_eq!((odd.width, odd.height), (80, 142));
}

#[test]
fn params_reject_odd_sizes() {
    let p = EncodeParams {
        width: 1081,
        ..params()
    };
    assert!(p.validate().is_err());
}

#[test]
fn settings_json_fills_defaults_and_validates() {
    let s = ExportSettings::from_json_str(r#"{ "audio_bitrate": 192000 }"#).unwrap();
    assert_eq!(s.audio_bitrate, 192_000);
    assert_eq!(s.hard_limit_bytes, 50_000_000);

    assert!(ExportSettings::from_json_str(r#"{ "audio_bitrate": 320000 }"#).is_err());
    assert!(
        ExportSettings::from_json_str(r#"{ "soft_limit_bytes": 60000000 }"#).is_err()
    );
    assert!(ExportSettings::from_json_str(r#"{ "retry_scale_factor": 1.0 }"#).is_err());
}
