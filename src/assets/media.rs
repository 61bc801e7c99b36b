use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::foundation::error::{ReelError, ReelResult};

/// Stream facts for one clip, as reported by `ffprobe`.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipInfo {
    /// Clip file path.
    pub source_path: PathBuf,
    /// Frame width.
    pub width: u32,
    /// Frame height.
    pub height: u32,
    /// Frame rate numerator.
    pub fps_num: u32,
    /// Frame rate denominator.
    pub fps_den: u32,
    /// Container duration; zero when unknown.
    pub duration: Duration,
}

impl ClipInfo {
    /// Frames per second, `0.0` for a malformed rate.
    pub fn source_fps(&self) -> f64 {
        if self.fps_den == 0 {
            0.0
        } else {
            f64::from(self.fps_num) / f64::from(self.fps_den)
        }
    }
}

/// Map item-local time to clip time, looping when the clip is shorter than the item.
pub fn clip_source_time(local: Duration, offset: Duration, clip_duration: Option<Duration>) -> Duration {
    let t = local + offset;
    match clip_duration {
        Some(d) if !d.is_zero() => {
            let nanos = t.as_nanos() % d.as_nanos();
            Duration::from_nanos(u64::try_from(nanos).unwrap_or(0))
        }
        _ => t,
    }
}

/// Probe dimensions, frame rate and duration of a clip with `ffprobe`.
#[cfg(feature = "media-ffmpeg")]
pub fn probe_clip(source_path: &Path) -> ReelResult<ClipInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        r_frame_rate: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| ReelError::evaluation(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(ReelError::evaluation(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| ReelError::evaluation(format!("ffprobe json parse failed: {e}")))?;
    let stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| ReelError::evaluation("no video stream found"))?;
    let width = stream
        .width
        .ok_or_else(|| ReelError::evaluation("missing video width from ffprobe"))?;
    let height = stream
        .height
        .ok_or_else(|| ReelError::evaluation("missing video height from ffprobe"))?;
    let (fps_num, fps_den) = parse_ff_ratio(stream.r_frame_rate.as_deref().unwrap_or("0/1"))
        .ok_or_else(|| ReelError::evaluation("invalid video r_frame_rate"))?;
    let duration = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .and_then(|s| s.parse::<f64>().ok())
        .map(crate::foundation::core::secs)
        .unwrap_or_default();

    Ok(ClipInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        fps_num,
        fps_den,
        duration,
    })
}

/// Clip probing is unavailable without the `media-ffmpeg` feature.
#[cfg(not(feature = "media-ffmpeg"))]
pub fn probe_clip(_source_path: &Path) -> ReelResult<ClipInfo> {
    Err(ReelError::evaluation(
        "video clips require the 'media-ffmpeg' feature",
    ))
}

/// Decode up to `frame_count` straight RGBA8 frames starting at `start`.
#[cfg(feature = "media-ffmpeg")]
pub fn decode_clip_frames_rgba8(
    info: &ClipInfo,
    start: Duration,
    frame_count: u32,
) -> ReelResult<Vec<Vec<u8>>> {
    if frame_count == 0 {
        return Ok(Vec::new());
    }

    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-ss", &format!("{:.9}", start.as_secs_f64())])
        .arg("-i")
        .arg(&info.source_path)
        .args([
            "-frames:v",
            &frame_count.to_string(),
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "pipe:1",
        ])
        .output()
        .map_err(|e| ReelError::evaluation(format!("failed to run ffmpeg for clip decode: {e}")))?;

    if !out.status.success() {
        return Err(ReelError::evaluation(format!(
            "ffmpeg clip decode failed for '{}': {}",
            info.source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let expected_len = info.width as usize * info.height as usize * 4;
    if expected_len == 0 {
        return Err(ReelError::evaluation(
            "decoded clip frame size is zero (invalid source dimensions)",
        ));
    }
    if out.stdout.len() < expected_len || !out.stdout.len().is_multiple_of(expected_len) {
        return Err(ReelError::evaluation(format!(
            "decoded clip batch has invalid size: got {} bytes, expected multiples of {expected_len}",
            out.stdout.len()
        )));
    }

    let available = (out.stdout.len() / expected_len).min(frame_count as usize);
    Ok(out
        .stdout
        .chunks_exact(expected_len)
        .take(available)
        .map(<[u8]>::to_vec)
        .collect())
}

/// Clip decoding is unavailable without the `media-ffmpeg` feature.
#[cfg(not(feature = "media-ffmpeg"))]
pub fn decode_clip_frames_rgba8(
    _info: &ClipInfo,
    _start: Duration,
    _frame_count: u32,
) -> ReelResult<Vec<Vec<u8>>> {
    Err(ReelError::evaluation(
        "video clips require the 'media-ffmpeg' feature",
    ))
}

#[cfg(feature = "media-ffmpeg")]
fn parse_ff_ratio(s: &str) -> Option<(u32, u32)> {
    let mut parts = s.split('/');
    let a = parts.next()?.parse::<u32>().ok()?;
    let b = parts.next()?.parse::<u32>().ok()?;
    if b == 0 {
        return None;
    }
    Some((a, b))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
