use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::foundation::error::{ReelError, ReelResult};

/// Cooperative cancellation flag shared between a render and its caller, with an optional
/// time budget.
///
/// Clones share the flag. Long-running stages call [`CancelToken::check`] between frames.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<(Instant, Duration)>,
}

impl CancelToken {
    /// Fresh token with no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Same flag, failing with [`ReelError::RenderTimeout`] once `budget` has elapsed from now.
    pub fn with_budget(&self, budget: Duration) -> Self {
        Self {
            flag: self.flag.clone(),
            deadline: Some((Instant::now() + budget, budget)),
        }
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Return `true` once [`CancelToken::cancel`] was called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// `Err(Cancelled)` after cancellation, `Err(RenderTimeout)` past the deadline.
    pub fn check(&self) -> ReelResult<()> {
        if self.is_cancelled() {
            return Err(ReelError::Cancelled);
        }
        if let Some((deadline, budget)) = self.deadline
            && Instant::now() >= deadline
        {
            return Err(ReelError::RenderTimeout { budget });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/cancel.rs"]
mod tests;
