//! Fixed-capacity history buffers.
//!
//! Long runs must not accumulate per-generation state. Convergence checks
//! and diagnostic traces keep only the most recent values in a ring buffer
//! whose capacity is fixed at construction.

use std::collections::VecDeque;

/// A ring buffer that keeps the last `capacity` values pushed.
#[derive(Debug, Clone)]
pub struct BoundedHistory<T> {
    buf: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedHistory<T> {
    /// Creates an empty buffer. A capacity of 0 is bumped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buf: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a value, evicting the oldest one when full.
    pub fn push(&mut self, value: T) {
        if self.buf.len() == self.capacity {
            self.buf.pop_front();
        }
        self.buf.push_back(value);
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been pushed.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns `true` once `capacity` values are stored.
    pub fn is_full(&self) -> bool {
        self.buf.len() == self.capacity
    }

    /// Maximum number of stored values.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest stored value.
    pub fn oldest(&self) -> Option<&T> {
        self.buf.front()
    }

    /// Most recent value.
    pub fn newest(&self) -> Option<&T> {
        self.buf.back()
    }

    /// Iterates oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buf.iter()
    }

    /// Removes every value, keeping the capacity.
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

impl<T: Clone> BoundedHistory<T> {
    /// Copies the stored values, oldest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.buf.iter().cloned().collect()
    }
}

/// Stagnation detector over the best cost of the last few steps.
///
/// The window holds `limit + 1` values. The run counts as converged once
/// the window is full and the relative improvement from its oldest to its
/// newest entry is at most `epsilon`, i.e. `limit` consecutive steps passed
/// without meaningful progress.
#[derive(Debug, Clone)]
pub struct ConvergenceWindow {
    history: BoundedHistory<f64>,
    epsilon: f64,
    enabled: bool,
}

impl ConvergenceWindow {
    /// `limit == 0` disables detection.
    pub fn new(limit: usize, epsilon: f64) -> Self {
        Self {
            history: BoundedHistory::new(limit + 1),
            epsilon,
            enabled: limit > 0,
        }
    }

    /// Records the best cost after a step.
    pub fn record(&mut self, best_cost: f64) {
        self.history.push(best_cost);
    }

    /// Returns `true` if the window shows no meaningful improvement.
    pub fn is_converged(&self) -> bool {
        if !self.enabled || !self.history.is_full() {
            return false;
        }
        match (self.history.oldest(), self.history.newest()) {
            (Some(&old), Some(&new)) => {
                let scale = old.abs().max(f64::MIN_POSITIVE);
                (old - new) / scale <= self.epsilon
            }
            _ => false,
        }
    }

    /// Capacity of the underlying ring buffer.
    pub fn capacity(&self) -> usize {
        self.history.capacity()
    }

    /// Number of recorded values currently held.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
