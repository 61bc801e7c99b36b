use crate::animation::ease::lerp;
use crate::animation::spring::Spring;
use crate::foundation::core::Rect;
use crate::foundation::error::{ReelError, ReelResult};
use crate::model::config::RenderConfig;
use crate::overlay::layer::Layer;

const EPS: f64 = 1e-6;

/// Largest scale a pop entrance reaches under `cfg`.
pub fn pop_peak_scale(cfg: &RenderConfig) -> f64 {
    let peak = Spring::with_damping(cfg.animation.spring_damping).peak();
    lerp(cfg.animation.pop_from_scale, 1.0, peak)
}

/// Fail when any part of `layer`'s computed frame enters the protected margins.
///
/// The frame covers every node at rest, at its entrance start offset and at peak pop scale, with
/// rotation applied.
pub fn validate(layer: &Layer, cfg: &RenderConfig) -> ReelResult<()> {
    let Some(frame) = layer.frame(pop_peak_scale(cfg)) else {
        return Ok(());
    };
    check_frame(layer.kind.as_str(), frame, cfg.safe_rect())
}

pub(crate) fn check_frame(overlay: &str, frame: Rect, safe: Rect) -> ReelResult<()> {
    let checks = [
        ("top", safe.y0 - frame.y0),
        ("bottom", frame.y1 - safe.y1),
        ("left", safe.x0 - frame.x0),
        ("right", frame.x1 - safe.x1),
    ];
    for (edge, overshoot) in checks {
        if overshoot > EPS {
            return Err(ReelError::safe_zone(
                overlay,
                format!(
                    "frame ({:.1},{:.1})-({:.1},{:.1}) crosses the {edge} inset by {overshoot:.1}px",
                    frame.x0, frame.y0, frame.x1, frame.y1
                ),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/safe_zone.rs"]
mod tests;
