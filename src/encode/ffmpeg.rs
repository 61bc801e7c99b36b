use std::io::{Read as _, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use anyhow::Context as _;

use crate::encode::exporter::{EncodeBackend, EncodeParams};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::frame::FrameRGBA;

/// Return `true` when an `ffmpeg` binary answers `-version`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub(crate) fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// H.264 `yuv420p` + AAC MP4 encoding through the system `ffmpeg` binary.
#[derive(Clone, Copy, Debug, Default)]
pub struct FfmpegBackend;

impl EncodeBackend for FfmpegBackend {
    fn open(&self, out: &Path, params: &EncodeParams) -> ReelResult<Box<dyn FrameSink>> {
        Ok(Box::new(FfmpegSink::new(out, params.clone())?))
    }

    fn reencode(&self, input: &Path, out: &Path, params: &EncodeParams) -> ReelResult<()> {
        params.validate()?;
        require_ffmpeg()?;
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .args(["-y", "-loglevel", "error", "-i"])
            .arg(input)
            .args([
                "-vf",
                &format!("scale={}:{}", params.width, params.height),
            ])
            .args(video_args(params))
            .args(["-c:a", "aac", "-b:a", &params.audio_bitrate.to_string()])
            .args(["-movflags", "+faststart", "-f", "mp4"])
            .arg(out);
        tracing::debug!(
            input = %input.display(),
            width = params.width,
            height = params.height,
            video_bitrate = params.video_bitrate,
            "re-encoding"
        );
        let output = cmd
            .output()
            .map_err(|e| ReelError::encoding(format!("failed to spawn ffmpeg: {e}")))?;
        if !output.status.success() {
            return Err(ReelError::encoding(format!(
                "ffmpeg re-encode exited with status {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

fn require_ffmpeg() -> ReelResult<()> {
    if is_ffmpeg_on_path() {
        Ok(())
    } else {
        Err(ReelError::encoding(
            "ffmpeg is required for MP4 encoding, but was not found on PATH",
        ))
    }
}

fn video_args(params: &EncodeParams) -> Vec<String> {
    let rate = params.video_bitrate.to_string();
    vec![
        "-c:v".into(),
        "libx264".into(),
        "-b:v".into(),
        rate.clone(),
        "-maxrate".into(),
        rate,
        "-bufsize".into(),
        (params.video_bitrate * 2).to_string(),
        "-pix_fmt".into(),
        "yuv420p".into(),
    ]
}

struct Running {
    child: Child,
    stdin: Option<ChildStdin>,
    stderr: Option<JoinHandle<String>>,
}

/// Frame sink that pipes flattened RGBA frames into an `ffmpeg` child.
///
/// The child is spawned in [`FrameSink::begin`] and killed on drop unless [`FrameSink::end`]
/// completed, so an abandoned encode never keeps writing to disk.
pub struct FfmpegSink {
    out: PathBuf,
    params: EncodeParams,
    scratch: Vec<u8>,
    running: Option<Running>,
}

impl FfmpegSink {
    /// Prepare an encode of `params` into `out`.
    pub fn new(out: &Path, params: EncodeParams) -> ReelResult<Self> {
        params.validate()?;
        ensure_parent_dir(out)?;
        Ok(Self {
            out: out.to_path_buf(),
            scratch: vec![0u8; params.width as usize * params.height as usize * 4],
            params,
            running: None,
        })
    }

    fn spawn(&self, audio: Option<&Path>) -> ReelResult<Running> {
        require_ffmpeg()?;
        let p = &self.params;
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .args(["-y", "-loglevel", "error"])
            .args([
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgba",
                "-s",
                &format!("{}x{}", p.width, p.height),
                "-r",
                &format!("{}/{}", p.fps.num, p.fps.den),
                "-i",
                "pipe:0",
            ]);
        match audio {
            Some(path) => {
                cmd.arg("-i")
                    .arg(path)
                    .args(["-map", "0:v:0", "-map", "1:a:0", "-shortest"])
                    .args(["-c:a", "aac", "-b:a", &p.audio_bitrate.to_string()]);
            }
            None => {
                cmd.arg("-an");
            }
        }
        cmd.args(video_args(p))
            .args(["-movflags", "+faststart", "-f", "mp4"])
            .arg(&self.out);

        let mut child = cmd
            .spawn()
            .map_err(|e| ReelError::encoding(format!("failed to spawn ffmpeg: {e}")))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ReelError::encoding("failed to open ffmpeg stdin"))?;
        let stderr = child.stderr.take().map(|mut pipe| {
            std::thread::spawn(move || {
                let mut text = String::new();
                let _ = pipe.read_to_string(&mut text);
                text
            })
        });
        tracing::debug!(
            out = %self.out.display(),
            width = p.width,
            height = p.height,
            video_bitrate = p.video_bitrate,
            audio = audio.is_some(),
            "spawned ffmpeg"
        );
        Ok(Running {
            child,
            stdin: Some(stdin),
            stderr,
        })
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        if cfg.width != self.params.width || cfg.height != self.params.height {
            return Err(ReelError::validation(format!(
                "sink opened for {}x{}, compositor produces {}x{}",
                self.params.width, self.params.height, cfg.width, cfg.height
            )));
        }
        self.params.fps = cfg.fps;
        let audio = cfg.audio.or_else(|| self.params.audio.clone());
        self.running = Some(self.spawn(audio.as_deref())?);
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()> {
        if frame.width != self.params.width || frame.height != self.params.height {
            return Err(ReelError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.params.width, self.params.height
            )));
        }
        flatten_to_opaque_rgba8(
            &mut self.scratch,
            &frame.data,
            frame.premultiplied,
            self.params.bg_rgba,
        )?;
        let Some(stdin) = self.running.as_mut().and_then(|r| r.stdin.as_mut()) else {
            return Err(ReelError::encoding("ffmpeg sink is not running"));
        };
        stdin
            .write_all(&self.scratch)
            .map_err(|e| ReelError::encoding(format!("failed to write frame to ffmpeg: {e}")))
    }

    fn end(&mut self) -> ReelResult<()> {
        let Some(mut running) = self.running.take() else {
            return Err(ReelError::encoding("ffmpeg sink is not running"));
        };
        drop(running.stdin.take());
        let status = running
            .child
            .wait()
            .map_err(|e| ReelError::encoding(format!("failed to wait for ffmpeg: {e}")))?;
        let stderr = running
            .stderr
            .take()
            .and_then(|h| h.join().ok())
            .unwrap_or_default();
        if !status.success() {
            return Err(ReelError::encoding(format!(
                "ffmpeg exited with status {status}: {}",
                stderr.trim()
            )));
        }
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        if let Some(mut running) = self.running.take() {
            drop(running.stdin.take());
            let _ = running.child.kill();
            let _ = running.child.wait();
            tracing::debug!(out = %self.out.display(), "killed unfinished ffmpeg encode");
        }
    }
}

/// Composite `src` over an opaque `bg_rgba` into `dst`.
pub(crate) fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg_rgba: [u8; 4],
) -> ReelResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ReelError::validation(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }
    let bg = [
        u16::from(bg_rgba[0]),
        u16::from(bg_rgba[1]),
        u16::from(bg_rgba[2]),
    ];

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - a;
        for c in 0..3 {
            let fg = if src_is_premul {
                u16::from(s[c])
            } else {
                mul_div255_u16(u16::from(s[c]), a)
            };
            d[c] = (fg + mul_div255_u16(bg[c], inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
