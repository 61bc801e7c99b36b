use std::time::Duration;

use crate::foundation::error::{ReelError, ReelResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Width of the reference canvas all layout constants are authored against.
pub const REFERENCE_WIDTH: u32 = 1080;

/// Absolute 0-based frame index in output timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Half-open frame range `[start, end)` in timeline space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    /// Inclusive range start.
    pub start: FrameIndex,
    /// Exclusive range end.
    pub end: FrameIndex,
}

impl FrameRange {
    /// Create a validated range with `start <= end`.
    pub fn new(start: FrameIndex, end: FrameIndex) -> ReelResult<Self> {
        if start.0 > end.0 {
            return Err(ReelError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// Number of frames contained in the range.
    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    /// Return `true` when the range has no frames.
    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    /// Return `true` when `f` is inside `[start, end)`.
    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }
}

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> ReelResult<Self> {
        if den == 0 {
            return Err(ReelError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(ReelError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Exact timeline position of frame `f`.
    pub fn frame_time(self, f: FrameIndex) -> Duration {
        let nanos = u128::from(f.0) * u128::from(self.den) * 1_000_000_000 / u128::from(self.num);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    /// Number of frames covering `d`, rounded to the nearest frame.
    pub fn frames_in(self, d: Duration) -> u64 {
        let num = d.as_nanos() * u128::from(self.num);
        let den = u128::from(self.den) * 1_000_000_000;
        u64::try_from((num + den / 2) / den).unwrap_or(u64::MAX)
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas.
    pub fn new(width: u32, height: u32) -> ReelResult<Self> {
        if width == 0 || height == 0 {
            return Err(ReelError::validation("canvas width/height must be non-zero"));
        }
        Ok(Self { width, height })
    }

    /// Layout scale relative to the 1080-wide reference canvas.
    pub fn scale(self) -> f64 {
        f64::from(self.width) / f64::from(REFERENCE_WIDTH)
    }

    /// Canvas bounds as a rectangle anchored at the origin.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Bytes needed for one premultiplied RGBA8 frame.
    pub fn frame_bytes(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
        }
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Byte order used by frame buffers.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Half-open window `[start, start + duration)` on the master timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TimeRange {
    /// Window start.
    pub start: Duration,
    /// Window length.
    pub duration: Duration,
}

impl TimeRange {
    /// Window from a start and a length.
    pub const fn new(start: Duration, duration: Duration) -> Self {
        Self { start, duration }
    }

    /// Window from two endpoints, `end` is clamped to `start`.
    pub fn between(start: Duration, end: Duration) -> Self {
        Self {
            start,
            duration: end.saturating_sub(start),
        }
    }

    /// Exclusive end.
    pub fn end(self) -> Duration {
        self.start + self.duration
    }

    /// Return `true` when `t` is inside `[start, end)`.
    pub fn contains(self, t: Duration) -> bool {
        self.start <= t && t < self.end()
    }

    /// Return `true` when both windows share a non-empty span.
    pub fn overlaps(self, other: TimeRange) -> bool {
        self.start < other.end() && other.start < self.end()
    }

    /// Time elapsed since the window start, saturating at zero.
    pub fn local(self, t: Duration) -> Duration {
        t.saturating_sub(self.start)
    }

    /// Normalized progress of `t` through the window, clamped to `[0, 1]`.
    pub fn progress(self, t: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.local(t).as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }
}

/// 2D placement applied to a track item before compositing.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform2D {
    /// Translation in canvas pixels.
    pub translate: Vec2,
    /// Rotation in radians around the canvas center.
    pub rotation_rad: f64,
    /// Uniform scale around the canvas center.
    pub scale: f64,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            rotation_rad: 0.0,
            scale: 1.0,
        }
    }
}

impl Transform2D {
    /// Return `true` when the transform leaves pixels in place.
    pub fn is_identity(&self) -> bool {
        self.translate == Vec2::ZERO && self.rotation_rad == 0.0 && self.scale == 1.0
    }

    /// Convert to an affine pivoting around `center`.
    pub fn to_affine(self, center: Point) -> Affine {
        let pivot = center.to_vec2();
        Affine::translate(self.translate + pivot)
            * Affine::rotate(self.rotation_rad)
            * Affine::scale(self.scale)
            * Affine::translate(-pivot)
    }
}

/// Convert fractional seconds into a duration, clamping negatives to zero.
pub fn secs(v: f64) -> Duration {
    if !v.is_finite() || v <= 0.0 {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(v)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
