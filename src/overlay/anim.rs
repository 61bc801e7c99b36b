use std::time::Duration;

use crate::animation::ease::{Ease, lerp};
use crate::animation::spring::Spring;
use crate::foundation::core::{TimeRange, Vec2};
use crate::model::config::AnimationTiming;
use crate::overlay::layer::{Appear, Layer, Motion};

/// Animated state of one node at an overlay-local time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeState {
    /// Opacity multiplier in `[0, 1]`.
    pub opacity: f64,
    /// Scale around the node pivot.
    pub scale: f64,
    /// Translation from the resting position.
    pub offset: Vec2,
    /// Tween progress in `[0, 1]`; `1.0` for nodes without a tween.
    pub progress: f64,
}

impl NodeState {
    const HIDDEN: Self = Self {
        opacity: 0.0,
        scale: 1.0,
        offset: Vec2::ZERO,
        progress: 0.0,
    };

    /// Return `true` when nothing would be drawn.
    pub fn is_hidden(&self) -> bool {
        self.opacity <= 0.0
    }
}

/// Evaluate `motion` at `local` time since the overlay start.
///
/// `window` is the overlay duration; it only matters for the exit fade.
pub fn node_state(
    motion: &Motion,
    local: Duration,
    window: Duration,
    fade_out: bool,
    timing: &AnimationTiming,
) -> NodeState {
    if local < motion.delay || local >= window {
        return NodeState::HIDDEN;
    }
    let t = (local - motion.delay).as_secs_f64();
    let fade = timing.fade().as_secs_f64();
    let fade_in = Ease::OutCubic.apply(ratio(t, fade));

    let mut state = NodeState {
        opacity: 1.0,
        scale: 1.0,
        offset: Vec2::ZERO,
        progress: 1.0,
    };
    match motion.appear {
        Appear::Instant => {}
        Appear::Fade => state.opacity = fade_in,
        Appear::Pop => {
            let spring = Spring::with_damping(timing.spring_damping);
            state.opacity = fade_in;
            state.scale = lerp(timing.pop_from_scale, 1.0, spring.value(t));
        }
        Appear::Rise { distance } => {
            state.opacity = fade_in;
            let k = Ease::OutCubic.apply(ratio(t, 2.0 * fade));
            state.offset = Vec2::new(0.0, distance * (1.0 - k));
        }
    }
    if let Some(tween) = motion.tween {
        state.progress = tween.ease.apply(ratio(t, tween.length.as_secs_f64()));
    }
    if fade_out {
        let remaining = (window - local).as_secs_f64();
        state.opacity *= ratio(remaining, fade);
    }
    state
}

/// Time from the overlay start until `motion` has fully arrived.
pub fn entrance_end(motion: &Motion, timing: &AnimationTiming) -> Duration {
    let appear = match motion.appear {
        Appear::Instant => Duration::ZERO,
        Appear::Fade => timing.fade(),
        Appear::Pop => timing
            .fade()
            .max(Spring::with_damping(timing.spring_damping).settle_time()),
        Appear::Rise { .. } => timing.fade() * 2,
    };
    let tween = motion.tween.map(|t| t.length).unwrap_or_default();
    motion.delay + appear.max(tween)
}

/// Master-timeline windows during which `layer` is animating when shown over `window`.
///
/// One window covers all node entrances (staggered children count as a single animation), a
/// second covers the exit fade.
pub fn animation_windows(
    layer: &Layer,
    window: TimeRange,
    timing: &AnimationTiming,
) -> Vec<TimeRange> {
    let mut out = Vec::with_capacity(2);
    let animated = layer
        .nodes
        .iter()
        .filter(|n| n.motion.appear != Appear::Instant || n.motion.tween.is_some());
    let first = animated.clone().map(|n| n.motion.delay).min();
    let last = animated.map(|n| entrance_end(&n.motion, timing)).max();
    if let (Some(first), Some(last)) = (first, last) {
        let start = window.start + first;
        let end = (window.start + last).min(window.end());
        if end > start {
            out.push(TimeRange::between(start, end));
        }
    }
    if layer.fade_out && !layer.nodes.is_empty() {
        let fade = timing.fade().min(window.duration);
        let start = window.end() - fade;
        let exit = TimeRange::between(start, window.end());
        match out.last_mut() {
            Some(entry) if entry.end() >= exit.start => {
                *entry = TimeRange::between(entry.start, exit.end());
            }
            _ if !exit.duration.is_zero() => out.push(exit),
            _ => {}
        }
    }
    out
}

fn ratio(num: f64, den: f64) -> f64 {
    if den <= 0.0 {
        return 1.0;
    }
    (num / den).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/anim.rs"]
mod tests;
