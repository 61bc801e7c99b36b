use std::fmt;
use std::time::Duration;

use crate::foundation::core::TimeRange;
use crate::model::media::AudioRef;

/// Default cut interval when no beat analysis is available.
pub const DEFAULT_BEAT_INTERVAL: Duration = Duration::from_millis(750);
/// Shortest segment between two cuts.
pub const MIN_SEGMENT: Duration = Duration::from_millis(1200);

/// Source of cut candidates inside a timeline window.
pub trait BeatStrategy: fmt::Debug + Send + Sync {
    /// Candidate cut times (master timeline) inside `window`.
    fn beats(&self, window: TimeRange, music: Option<&AudioRef>) -> Vec<Duration>;
}

/// Cuts on a fixed grid from the window start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedIntervalBeats {
    /// Grid spacing.
    pub interval: Duration,
}

impl Default for FixedIntervalBeats {
    fn default() -> Self {
        Self {
            interval: DEFAULT_BEAT_INTERVAL,
        }
    }
}

impl BeatStrategy for FixedIntervalBeats {
    fn beats(&self, window: TimeRange, _music: Option<&AudioRef>) -> Vec<Duration> {
        if self.interval.is_zero() {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut t = window.start + self.interval;
        while t < window.end() {
            out.push(t);
            t += self.interval;
        }
        out
    }
}

/// Beat times computed elsewhere, e.g. by an external audio analyzer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExplicitBeats {
    /// Beat times on the master timeline.
    pub times: Vec<Duration>,
}

impl BeatStrategy for ExplicitBeats {
    fn beats(&self, window: TimeRange, _music: Option<&AudioRef>) -> Vec<Duration> {
        self.times
            .iter()
            .copied()
            .filter(|&t| t > window.start && t < window.end())
            .collect()
    }
}

/// Cut points inside `window` honoring [`MIN_SEGMENT`] on both sides of every cut.
///
/// Falls back to [`FixedIntervalBeats`] when the strategy yields fewer than two usable cuts.
pub fn cut_points(
    strategy: &dyn BeatStrategy,
    window: TimeRange,
    music: Option<&AudioRef>,
) -> Vec<Duration> {
    let cuts = select_cuts(strategy.beats(window, music), window);
    if cuts.len() >= 2 {
        return cuts;
    }
    tracing::debug!(usable = cuts.len(), "beat strategy unusable, using fixed interval");
    select_cuts(FixedIntervalBeats::default().beats(window, music), window)
}

fn select_cuts(mut beats: Vec<Duration>, window: TimeRange) -> Vec<Duration> {
    beats.retain(|&t| t > window.start && t < window.end());
    beats.sort();
    beats.dedup();
    let mut out: Vec<Duration> = Vec::new();
    let mut last = window.start;
    for t in beats {
        if t >= last + MIN_SEGMENT && window.end() >= t + MIN_SEGMENT {
            out.push(t);
            last = t;
        }
    }
    out
}

/// Segment ranges between consecutive cuts covering `window`.
pub fn segments(window: TimeRange, cuts: &[Duration]) -> Vec<TimeRange> {
    let mut bounds = Vec::with_capacity(cuts.len() + 2);
    bounds.push(window.start);
    bounds.extend_from_slice(cuts);
    bounds.push(window.end());
    bounds
        .windows(2)
        .map(|w| TimeRange::between(w[0], w[1]))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/planner/beat.rs"]
mod tests;
