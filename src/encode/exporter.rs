use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;

use crate::encode::ffmpeg::{FfmpegBackend, ensure_parent_dir};
use crate::encode::sink::FrameSink;
use crate::foundation::cancel::CancelToken;
use crate::foundation::core::Fps;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::compositor::{CompositeStats, Compositor};

/// Encoder parameters for one pass.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodeParams {
    /// Output width, even.
    pub width: u32,
    /// Output height, even.
    pub height: u32,
    /// Output frame rate.
    pub fps: Fps,
    /// Target video bitrate in bits per second.
    pub video_bitrate: u64,
    /// Target audio bitrate in bits per second.
    pub audio_bitrate: u64,
    /// Music file muxed under the video.
    pub audio: Option<PathBuf>,
    /// Opaque color transparent pixels are flattened onto.
    pub bg_rgba: [u8; 4],
}

impl EncodeParams {
    /// Reject zero or odd dimensions and zero bitrates.
    pub fn validate(&self) -> ReelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ReelError::validation("encode width/height must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(ReelError::validation(
                "encode width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        if self.video_bitrate == 0 || self.audio_bitrate == 0 {
            return Err(ReelError::validation("encode bitrates must be non-zero"));
        }
        Ok(())
    }

    /// Parameters for the size-limit retry: lower bitrate, smaller even frame.
    pub fn downgraded(&self, settings: &ExportSettings) -> Self {
        Self {
            width: scale_even(self.width, settings.retry_scale_factor),
            height: scale_even(self.height, settings.retry_scale_factor),
            video_bitrate: ((self.video_bitrate as f64) * settings.retry_bitrate_factor).round()
                as u64,
            ..self.clone()
        }
    }
}

fn scale_even(v: u32, factor: f64) -> u32 {
    let scaled = (f64::from(v) * factor / 2.0).floor() as u32 * 2;
    scaled.max(2)
}

/// Pluggable encoder: streams composited frames into a file and re-encodes finished files.
pub trait EncodeBackend: Send + Sync {
    /// Open a frame sink writing to `out`.
    fn open(&self, out: &Path, params: &EncodeParams) -> ReelResult<Box<dyn FrameSink>>;
    /// Re-encode the finished file `input` into `out` with `params`.
    fn reencode(&self, input: &Path, out: &Path, params: &EncodeParams) -> ReelResult<()>;
}

/// Size and bitrate budgets for an export.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Size above which a warning is logged.
    pub soft_limit_bytes: u64,
    /// Size above which the export is retried once and then fails.
    pub hard_limit_bytes: u64,
    /// Lower end of the video bitrate band.
    pub min_video_bitrate: u64,
    /// Upper end of the video bitrate band.
    pub max_video_bitrate: u64,
    /// Audio bitrate, 128-192 kbps.
    pub audio_bitrate: u64,
    /// Bitrate multiplier for the retry pass.
    pub retry_bitrate_factor: f64,
    /// Resolution multiplier for the retry pass.
    pub retry_scale_factor: f64,
    /// Background for flattening transparent pixels.
    pub bg_rgba: [u8; 4],
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            soft_limit_bytes: 20_000_000,
            hard_limit_bytes: 50_000_000,
            min_video_bitrate: 8_000_000,
            max_video_bitrate: 12_000_000,
            audio_bitrate: 160_000,
            retry_bitrate_factor: 0.6,
            retry_scale_factor: 0.75,
            bg_rgba: [0, 0, 0, 255],
        }
    }
}

impl ExportSettings {
    /// Load settings from JSON; absent fields take their defaults.
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        let settings: Self = serde_json::from_str(s).context("parse export settings JSON")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check limit ordering, the bitrate band and the retry factors.
    pub fn validate(&self) -> ReelResult<()> {
        if self.soft_limit_bytes == 0 || self.soft_limit_bytes > self.hard_limit_bytes {
            return Err(ReelError::validation(
                "export soft limit must be non-zero and <= hard limit",
            ));
        }
        if self.min_video_bitrate == 0 || self.min_video_bitrate > self.max_video_bitrate {
            return Err(ReelError::validation(
                "export video bitrate band must be non-empty",
            ));
        }
        if !(128_000..=192_000).contains(&self.audio_bitrate) {
            return Err(ReelError::validation(format!(
                "audio bitrate {} outside 128-192 kbps",
                self.audio_bitrate
            )));
        }
        for (name, f) in [
            ("retry_bitrate_factor", self.retry_bitrate_factor),
            ("retry_scale_factor", self.retry_scale_factor),
        ] {
            if !(f > 0.0 && f < 1.0) {
                return Err(ReelError::validation(format!("{name} must be in (0, 1)")));
            }
        }
        Ok(())
    }

    /// Video bitrate spending the soft budget over `duration`, clamped to the band.
    pub fn video_bitrate_for(&self, duration: Duration, with_audio: bool) -> u64 {
        let secs = duration.as_secs_f64();
        if secs <= 0.0 {
            return self.max_video_bitrate;
        }
        let total = (self.soft_limit_bytes as f64 * 8.0 / secs) as u64;
        let audio = if with_audio { self.audio_bitrate } else { 0 };
        total
            .saturating_sub(audio)
            .clamp(self.min_video_bitrate, self.max_video_bitrate)
    }
}

/// What an export wrote.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportReport {
    /// Destination path.
    pub path: PathBuf,
    /// Final file size.
    pub size_bytes: u64,
    /// Encode passes run (1, or 2 after a downgrade).
    pub passes: u32,
    /// Parameters of the persisted pass.
    pub params: EncodeParams,
    /// Final size is above the soft budget.
    pub over_soft_budget: bool,
}

/// Drives a compositor into an encoder and enforces the size budgets.
///
/// Every pass writes to a temp file next to the destination. A pass over the hard limit triggers
/// exactly one re-encode at downgraded parameters; if that is still over, the export fails and
/// both temp files are removed. Only a passing file is renamed onto the destination.
#[derive(Clone)]
pub struct Exporter {
    backend: Arc<dyn EncodeBackend>,
    settings: ExportSettings,
}

impl std::fmt::Debug for Exporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exporter")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(ExportSettings::default())
    }
}

impl Exporter {
    /// Exporter over the system `ffmpeg`.
    pub fn new(settings: ExportSettings) -> Self {
        Self::with_backend(FfmpegBackend, settings)
    }

    /// Exporter over a custom backend.
    pub fn with_backend(backend: impl EncodeBackend + 'static, settings: ExportSettings) -> Self {
        Self {
            backend: Arc::new(backend),
            settings,
        }
    }

    /// Active settings.
    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// First-pass parameters for `compositor`.
    pub fn params_for(&self, compositor: &Compositor) -> EncodeParams {
        let audio = compositor.audio_path().map(Path::to_path_buf);
        EncodeParams {
            width: compositor.canvas().width,
            height: compositor.canvas().height,
            fps: compositor.fps(),
            video_bitrate: self
                .settings
                .video_bitrate_for(compositor.output_duration(), audio.is_some()),
            audio_bitrate: self.settings.audio_bitrate,
            audio,
            bg_rgba: self.settings.bg_rgba,
        }
    }

    /// Composite every frame into `out`.
    #[tracing::instrument(skip_all, fields(out = %out.display()))]
    pub fn export(
        &self,
        compositor: Compositor,
        out: &Path,
        cancel: &CancelToken,
    ) -> ReelResult<(CompositeStats, ExportReport)> {
        self.settings.validate()?;
        ensure_parent_dir(out)?;
        let dir = match out.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let params = self.params_for(&compositor);
        params.validate()?;
        let first = temp_output(&dir)?;
        let stats = {
            let mut sink = self.backend.open(first.path(), &params)?;
            compositor.render(sink.as_mut(), cancel)?
        };
        let size = file_size(first.path())?;
        tracing::debug!(size_bytes = size, video_bitrate = params.video_bitrate, "first pass");

        let hard = self.settings.hard_limit_bytes;
        let (file, size, passes, params) = if size > hard {
            let retry = params.downgraded(&self.settings);
            tracing::warn!(
                size_bytes = size,
                limit_bytes = hard,
                width = retry.width,
                height = retry.height,
                video_bitrate = retry.video_bitrate,
                "export over hard limit, re-encoding once"
            );
            cancel.check()?;
            let second = temp_output(&dir)?;
            self.backend.reencode(first.path(), second.path(), &retry)?;
            let size = file_size(second.path())?;
            if size > hard {
                return Err(ReelError::ExportSizeExceeded {
                    size_bytes: size,
                    limit_bytes: hard,
                });
            }
            (second, size, 2, retry)
        } else {
            (first, size, 1, params)
        };

        let over_soft_budget = size > self.settings.soft_limit_bytes;
        if over_soft_budget {
            tracing::warn!(
                size_bytes = size,
                soft_limit_bytes = self.settings.soft_limit_bytes,
                "export over soft size budget"
            );
        }
        file.persist(out)
            .with_context(|| format!("failed to move export into '{}'", out.display()))?;
        tracing::info!(size_bytes = size, passes, "exported");

        Ok((
            stats,
            ExportReport {
                path: out.to_path_buf(),
                size_bytes: size,
                passes,
                params,
                over_soft_budget,
            },
        ))
    }
}

fn temp_output(dir: &Path) -> ReelResult<tempfile::NamedTempFile> {
    let file = tempfile::Builder::new()
        .prefix(".snapreel-")
        .suffix(".mp4")
        .tempfile_in(dir)
        .with_context(|| format!("failed to create temp output in '{}'", dir.display()))?;
    Ok(file)
}

fn file_size(path: &Path) -> ReelResult<u64> {
    let meta = std::fs::metadata(path)
        .with_context(|| format!("failed to stat encoded output '{}'", path.display()))?;
    Ok(meta.len())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/exporter.rs"]
mod tests;
