//! Progress reporting.
//!
//! Engines emit a [`ProgressEvent`] per generation or temperature step to an
//! optional [`ProgressObserver`]. Hosts use this to forward live updates
//! without the optimizer knowing how they are delivered.

use std::time::Duration;

use crate::optimizer::Strategy;

/// A snapshot of an ongoing run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    /// The engine emitting the event.
    pub strategy: Strategy,
    /// Generation index, temperature step, or 2-opt pass.
    pub iteration: usize,
    /// Best route cost found so far.
    pub best_cost: f64,
    /// Time since the run started.
    pub elapsed: Duration,
}

/// Receives progress events. Must be cheap; it runs on the optimizer thread.
pub trait ProgressObserver: Send + Sync {
    /// Called once per reported step.
    fn on_progress(&self, event: &ProgressEvent);
}

impl<F> ProgressObserver for F
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn on_progress(&self, event: &ProgressEvent) {
        self(event)
    }
}
