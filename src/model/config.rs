use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::foundation::core::{Canvas, Fps, Rect};
use crate::foundation::error::{ReelError, ReelResult};

/// Smallest top/bottom reservation: 192px on the 1920px reference height.
pub const MIN_VERTICAL_FRACTION: f64 = 0.10;
/// Smallest side margin in reference pixels.
pub const MIN_SIDE_MARGIN_PX: f64 = 72.0;

/// Protected margins in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SafeInsets {
    /// Top inset.
    pub top: f64,
    /// Bottom inset.
    pub bottom: f64,
    /// Left inset.
    pub left: f64,
    /// Right inset.
    pub right: f64,
}

/// Resolution-independent safe-zone rules.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SafeZone {
    /// Fraction of canvas height reserved at top and at bottom.
    pub vertical_fraction: f64,
    /// Side margin in reference pixels, scaled with canvas width.
    pub side_margin_px: f64,
}

impl Default for SafeZone {
    fn default() -> Self {
        Self {
            vertical_fraction: MIN_VERTICAL_FRACTION,
            side_margin_px: MIN_SIDE_MARGIN_PX,
        }
    }
}

/// Font face selection for overlay text.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FontChoice {
    /// Family name used for metrics and display.
    pub family: String,
    /// Font file; glyphs are only rasterized when provided.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Bold and regular faces.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Face for hooks, steps, CTA and callouts.
    pub bold: FontChoice,
    /// Face for counters.
    pub regular: FontChoice,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            bold: FontChoice {
                family: "Inter Bold".to_string(),
                path: None,
            },
            regular: FontChoice {
                family: "Inter".to_string(),
                path: None,
            },
        }
    }
}

/// Point sizes per overlay text element, at the reference resolution.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Typography {
    /// Hero hook, 60-72.
    pub hook_pt: f64,
    /// Step text, 44-52.
    pub step_pt: f64,
    /// Counters, 36-48.
    pub counter_pt: f64,
    /// CTA, fixed 40.
    pub cta_pt: f64,
    /// Ingredient callouts, fixed 42.
    pub ingredient_pt: f64,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            hook_pt: 64.0,
            step_pt: 48.0,
            counter_pt: 42.0,
            cta_pt: 40.0,
            ingredient_pt: 42.0,
        }
    }
}

impl Typography {
    fn validate(&self) -> ReelResult<()> {
        check_range("typography.hook_pt", self.hook_pt, 60.0, 72.0)?;
        check_range("typography.step_pt", self.step_pt, 44.0, 52.0)?;
        check_range("typography.counter_pt", self.counter_pt, 36.0, 48.0)?;
        check_range("typography.cta_pt", self.cta_pt, 40.0, 40.0)?;
        check_range("typography.ingredient_pt", self.ingredient_pt, 42.0, 42.0)?;
        Ok(())
    }
}

/// Overlay animation timing.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimationTiming {
    /// Fade in/out length, 200-300ms.
    pub fade_ms: u64,
    /// Spring damping for pop entrances, 12-14.
    pub spring_damping: f64,
    /// Scale a pop entrance starts from.
    pub pop_from_scale: f64,
    /// Delay between sequential items, 120-150ms.
    pub stagger_ms: u64,
    /// Maximum overlay animations running at any instant.
    pub max_concurrent: usize,
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self {
            fade_ms: 250,
            spring_damping: 13.0,
            pop_from_scale: 0.6,
            stagger_ms: 135,
            max_concurrent: 2,
        }
    }
}

impl AnimationTiming {
    /// Fade length.
    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }

    /// Stagger delay.
    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }

    fn validate(&self) -> ReelResult<()> {
        check_range("animation.fade_ms", self.fade_ms as f64, 200.0, 300.0)?;
        check_range("animation.spring_damping", self.spring_damping, 12.0, 14.0)?;
        check_range("animation.stagger_ms", self.stagger_ms as f64, 120.0, 150.0)?;
        check_range("animation.pop_from_scale", self.pop_from_scale, 0.1, 1.0)?;
        if self.max_concurrent == 0 {
            return Err(ReelError::validation(
                "animation.max_concurrent must be >= 1",
            ));
        }
        Ok(())
    }
}

/// Brand colors as straight-alpha RGBA8.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BrandColors {
    /// Sticker and progress fill.
    pub tint: [u8; 4],
    /// Drop shadow behind stickers and text plates.
    pub shadow: [u8; 4],
    /// Primary text color.
    pub text: [u8; 4],
    /// Text stroke and plate color.
    pub stroke: [u8; 4],
}

impl Default for BrandColors {
    fn default() -> Self {
        Self {
            tint: [255, 107, 53, 255],
            shadow: [0, 0, 0, 110],
            text: [255, 255, 255, 255],
            stroke: [17, 17, 17, 255],
        }
    }
}

/// Render-wide settings passed explicitly to every planner, builder and renderer call.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output canvas, 1080x1920 by default.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Protected margins.
    pub safe_zone: SafeZone,
    /// Upper bound on output duration in milliseconds.
    pub max_duration_ms: u64,
    /// Overlay faces.
    pub fonts: FontConfig,
    /// Draw a contrasting stroke behind overlay text.
    pub text_stroke: bool,
    /// Brand palette.
    pub brand: BrandColors,
    /// Overlay text sizes.
    pub typography: Typography,
    /// Overlay animation timing.
    pub animation: AnimationTiming,
    /// Overlap between crossfaded track items in milliseconds.
    pub crossfade_ms: u64,
    /// Blur radius for the hook frame, in reference pixels.
    pub blur_radius_px: u32,
    /// Seed for CTA and hashtag rotation.
    pub cta_seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            fps: Fps::default(),
            safe_zone: SafeZone::default(),
            max_duration_ms: 15_000,
            fonts: FontConfig::default(),
            text_stroke: true,
            brand: BrandColors::default(),
            typography: Typography::default(),
            animation: AnimationTiming::default(),
            crossfade_ms: 500,
            blur_radius_px: 18,
            cta_seed: 0,
        }
    }
}

impl RenderConfig {
    /// Parse and validate a config from JSON; missing fields take defaults.
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        use anyhow::Context as _;
        let cfg: Self = serde_json::from_str(s).context("parse render config json")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: &Path) -> ReelResult<Self> {
        use anyhow::Context as _;
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read render config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Reject out-of-range values.
    pub fn validate(&self) -> ReelResult<()> {
        Canvas::new(self.canvas.width, self.canvas.height)?;
        Fps::new(self.fps.num, self.fps.den)?;
        if self.max_duration_ms == 0 {
            return Err(ReelError::validation("max_duration_ms must be > 0"));
        }
        check_range(
            "safe_zone.vertical_fraction",
            self.safe_zone.vertical_fraction,
            MIN_VERTICAL_FRACTION,
            0.4,
        )?;
        if !(self.safe_zone.side_margin_px >= MIN_SIDE_MARGIN_PX) {
            return Err(ReelError::validation(format!(
                "safe_zone.side_margin_px {} is below the {MIN_SIDE_MARGIN_PX}px minimum",
                self.safe_zone.side_margin_px
            )));
        }
        let side = self.safe_insets().left * 2.0;
        if side >= f64::from(self.canvas.width) {
            return Err(ReelError::validation(
                "safe_zone.side_margin_px leaves no drawable width",
            ));
        }
        self.typography.validate()?;
        self.animation.validate()?;
        Ok(())
    }

    /// Layout scale relative to the 1080-wide reference.
    pub fn scale(&self) -> f64 {
        self.canvas.scale()
    }

    /// Reference pixels converted to canvas pixels.
    pub fn px(&self, reference_px: f64) -> f64 {
        reference_px * self.scale()
    }

    /// Upper bound on output duration.
    pub fn max_duration(&self) -> Duration {
        Duration::from_millis(self.max_duration_ms)
    }

    /// Overlap between crossfaded items.
    pub fn crossfade(&self) -> Duration {
        Duration::from_millis(self.crossfade_ms)
    }

    /// Protected margins in canvas pixels.
    pub fn safe_insets(&self) -> SafeInsets {
        let v = f64::from(self.canvas.height) * self.safe_zone.vertical_fraction;
        let h = self.px(self.safe_zone.side_margin_px);
        SafeInsets {
            top: v,
            bottom: v,
            left: h,
            right: h,
        }
    }

    /// Region overlays may occupy.
    pub fn safe_rect(&self) -> Rect {
        let i = self.safe_insets();
        Rect::new(
            i.left,
            i.top,
            f64::from(self.canvas.width) - i.right,
            f64::from(self.canvas.height) - i.bottom,
        )
    }
}

fn check_range(name: &str, v: f64, lo: f64, hi: f64) -> ReelResult<()> {
    if !v.is_finite() || v < lo || v > hi {
        return Err(ReelError::validation(format!(
            "{name} must be within [{lo}, {hi}], got {v}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/model/config.rs"]
mod tests;
