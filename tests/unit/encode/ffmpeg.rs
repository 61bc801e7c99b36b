use super::*;
use crate::foundation::core::Fps;

fn params(width: u32, height: u32) -> EncodeParams {
    EncodeParams {
        width,
        height,
        fps: Fps::default(),
        video_bitrate: 8_000_000,
        audio_bitrate: 160_000,
        audio: None,
        bg_rgba: [0, 0, 0, 255],
    }
}

#[test]
fn flatten_premul_over_black_keeps_channels() {
    let src = vec![128u8, 0, 0, 128];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, true, [0, 0, 0, 255]).unwrap();
    assert_eq!(dst, vec![128, 0, 0, 255]);
}

#[test]
fn flatten_straight_over_black_scales_by_alpha() {
    let src = vec![255u8, 0, 0, 128];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, false, [0, 0, 0, 255]).unwrap();
    assert_eq!(dst, vec![128, 0, 0, 255]);
}

#[test]
fn flatten_transparent_pixel_becomes_background() {
    let src = vec![0u8; 8];
    let mut dst = vec![0u8; 8];
    flatten_to_opaque_rgba8(&mut dst, &src, true, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255, 10, 20, 30, 255]);
}

#[test]
fn flatten_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(flatten_to_opaque_rgba8(&mut dst, &[0u8; 4], true, [0, 0, 0, 255]).is_err());
}

#[test]
fn sink_rejects_odd_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    assert!(FfmpegSink::new(&dir.path().join("out.mp4"), params(11, 20)).is_err());
}

#[test]
fn sink_rejects_compositor_size_mismatch_before_spawning() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = FfmpegSink::new(&dir.path().join("out.mp4"), params(10, 20)).unwrap();
    let err = sink
        .begin(SinkConfig {
            width: 12,
            height: 20,
            fps: Fps::default(),
            audio: None,
        })
        .unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
    assert!(!dir.path().join("out.mp4").exists());
}

#[test]
fn push_without_begin_is_an_encoding_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = FfmpegSink::new(&dir.path().join("out.mp4"), params(2, 2)).unwrap();
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![255; 16],
        premultiplied: true,
    };
    assert!(matches!(
        sink.push_frame(FrameIndex(0), &frame),
        Err(ReelError::Encoding(_))
    ));
}
