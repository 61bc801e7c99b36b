use std::time::Duration;

use crate::effects::fx::EffectChain;
use crate::effects::resample::Fit;
use crate::foundation::core::{TimeRange, Transform2D};
use crate::foundation::error::{ReelError, ReelResult};
use crate::model::plan::{TrackItem, TrackSource, Transition};

/// Sequential track builder: each item starts where the previous one ends, minus its overlap.
#[derive(Debug, Default)]
pub(crate) struct Timeline {
    items: Vec<TrackItem>,
    cursor: Duration,
}

impl Timeline {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// End of the last item.
    pub(crate) fn cursor(&self) -> Duration {
        self.cursor
    }

    /// Append an item lasting `duration`.
    pub(crate) fn push(
        &mut self,
        source: TrackSource,
        duration: Duration,
        transition: Transition,
        effects: EffectChain,
    ) -> ReelResult<TimeRange> {
        let transition = if self.items.is_empty() {
            Transition::Cut
        } else {
            transition
        };
        let overlap = transition.overlap();
        let prev_len = self.items.last().map(|i| i.range.duration).unwrap_or_default();
        if overlap > prev_len || overlap > duration {
            return Err(ReelError::validation(format!(
                "transition overlap {overlap:?} longer than the items it joins"
            )));
        }
        let range = TimeRange::new(self.cursor - overlap, duration);
        self.items.push(TrackItem {
            source,
            range,
            transition_in: transition,
            fit: Fit::Cover,
            transform: Transform2D::default(),
            effects,
        });
        self.cursor = range.end();
        Ok(range)
    }

    /// Items plus the output duration.
    pub(crate) fn finish(self) -> (Vec<TrackItem>, Duration) {
        (self.items, self.cursor)
    }
}

/// Split `total + (parts - 1) * overlap` into `parts` item lengths whose overlapped sum is `total`.
pub(crate) fn split_even(total: Duration, parts: u32, overlap: Duration) -> Vec<Duration> {
    if parts == 0 {
        return Vec::new();
    }
    let span = total + overlap * (parts - 1);
    let base = span / parts;
    let mut out = vec![base; parts as usize];
    let used = base * (parts - 1);
    if let Some(last) = out.last_mut() {
        *last = span - used;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/planner/timeline.rs"]
mod tests;
