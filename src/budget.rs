//! Run budgets and termination reasons.
//!
//! A [`Budget`] combines an optional wall-clock deadline with an optional
//! externally owned cancellation flag. Engines poll [`Budget::exhausted`]
//! inside their inner loops, not only at generation boundaries.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Termination {
    /// The engine used its full iteration/generation allowance.
    #[default]
    Completed,
    /// The engine detected stagnation and stopped early.
    Converged,
    /// The wall-clock budget ran out. The result is the best found so far.
    BudgetExceeded,
    /// The host raised the cancellation flag.
    Cancelled,
}

impl Termination {
    /// Returns `true` if the run was cut short by the budget or the host.
    pub fn is_interrupted(self) -> bool {
        matches!(self, Termination::BudgetExceeded | Termination::Cancelled)
    }

    /// Stable identifier used in diagnostics maps and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Termination::Completed => "completed",
            Termination::Converged => "converged",
            Termination::BudgetExceeded => "budget_exceeded",
            Termination::Cancelled => "cancelled",
        }
    }
}

/// Wall-clock and cancellation budget shared by one optimization run.
#[derive(Debug, Clone)]
pub struct Budget {
    started: Instant,
    deadline: Option<Instant>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Default for Budget {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl Budget {
    /// A budget that never runs out.
    pub fn unlimited() -> Self {
        Self {
            started: Instant::now(),
            deadline: None,
            cancel: None,
        }
    }

    /// A budget that expires `limit` from now.
    pub fn with_limit(limit: Duration) -> Self {
        let started = Instant::now();
        Self {
            started,
            deadline: started.checked_add(limit),
            cancel: None,
        }
    }

    /// Builds a budget from an optional limit.
    pub fn new(limit: Option<Duration>) -> Self {
        match limit {
            Some(limit) => Self::with_limit(limit),
            None => Self::unlimited(),
        }
    }

    /// Attaches a cancellation flag owned by the host.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Time elapsed since the budget was created.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Returns the reason to stop, or `None` while the run may continue.
    ///
    /// Cancellation takes precedence over the deadline.
    pub fn exhausted(&self) -> Option<Termination> {
        if let Some(ref flag) = self.cancel {
            if flag.load(Ordering::Relaxed) {
                return Some(Termination::Cancelled);
            }
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(Termination::BudgetExceeded),
            _ => None,
        }
    }
}
