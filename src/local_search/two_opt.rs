//! 2-opt local improvement.
//!
//! # Algorithm
//!
//! Removing the edges entering and leaving a segment `r[s..=e]` and
//! reconnecting them reversed changes the route cost by
//!
//! ```text
//! delta = d(p, r[e]) + d(r[s], q) - d(p, r[s]) - d(r[e], q)
//! ```
//!
//! where `p` precedes the segment and `q` follows it (on open paths either
//! may be absent). On asymmetric matrices the inner legs change direction,
//! so their difference is added to `delta`.
//!
//! Segments are scanned with `s` ascending, then `e` ascending; the first
//! improving reversal found is applied immediately and scanning continues
//! on the updated route. Passes repeat until one makes no change, the pass
//! allowance runs out, or the run budget is exhausted.
//!
//! On closed tours position 0 is never moved, so the tour keeps its start.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::budget::{Budget, Termination};
use crate::error::{Result, RouteError};
use crate::model::Route;
use crate::scoring::Scorer;

/// Smallest cost decrease treated as an improvement.
const IMPROVEMENT_EPS: f64 = 1e-10;

/// 2-opt parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TwoOptConfig {
    /// Maximum number of full passes. Must be at least 1.
    pub max_passes: usize,
}

impl Default for TwoOptConfig {
    fn default() -> Self {
        Self { max_passes: 1000 }
    }
}

impl TwoOptConfig {
    /// Sets the pass allowance.
    pub fn with_max_passes(mut self, passes: usize) -> Self {
        self.max_passes = passes;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_passes == 0 {
            return Err(RouteError::config("two_opt.max_passes must be at least 1"));
        }
        Ok(())
    }
}

/// Result of a 2-opt run.
#[derive(Debug, Clone)]
pub struct TwoOptOutcome {
    /// The improved route.
    pub route: Route,
    /// Full passes executed.
    pub passes: usize,
    /// Reversals applied.
    pub improvements: usize,
    /// `Converged` at a local optimum, `Completed` when the pass allowance
    /// ran out, or the budget reason.
    pub termination: Termination,
}

/// Applies first-improvement 2-opt to `route`.
///
/// Routes with fewer than 4 stops are returned unchanged. The input route
/// is never modified; the outcome owns a fresh copy.
///
/// # Examples
///
/// ```
/// use u_routeopt::budget::Budget;
/// use u_routeopt::local_search::{two_opt, TwoOptConfig};
/// use u_routeopt::model::{CostMatrix, Route};
/// use u_routeopt::scoring::Scorer;
///
/// // Four points on a line at 0, 1, 2, 3.
/// let pos = [0.0f64, 1.0, 2.0, 3.0];
/// let data = pos.iter().flat_map(|a| pos.iter().map(move |b| (a - b).abs())).collect();
/// let matrix = CostMatrix::from_vec(4, data).unwrap();
/// let scorer = Scorer::new(&matrix, false);
///
/// let out = two_opt(&Route::new(vec![0, 2, 1, 3]), &scorer, &TwoOptConfig::default(), &Budget::unlimited());
/// assert_eq!(out.route.order(), &[0, 1, 2, 3]);
/// ```
pub fn two_opt(
    route: &Route,
    scorer: &Scorer<'_>,
    config: &TwoOptConfig,
    budget: &Budget,
) -> TwoOptOutcome {
    let n = route.len();
    if n < 4 {
        return TwoOptOutcome {
            route: route.clone(),
            passes: 0,
            improvements: 0,
            termination: Termination::Converged,
        };
    }

    let mut order = route.order().to_vec();
    let closed = scorer.is_closed();
    let mut passes = 0;
    let mut improvements = 0;
    let mut termination = Termination::Completed;

    'passes: while passes < config.max_passes.max(1) {
        passes += 1;
        let mut improved_this_pass = false;

        let s_range = if closed { 1..n - 1 } else { 0..n - 1 };
        for s in s_range {
            if let Some(reason) = budget.exhausted() {
                termination = reason;
                break 'passes;
            }
            for e in (s + 1)..n {
                if skip_full_reversal(closed, s, e, n) {
                    continue;
                }
                if reversal_delta(&order, scorer, s, e) < -IMPROVEMENT_EPS {
                    order[s..=e].reverse();
                    improvements += 1;
                    improved_this_pass = true;
                }
            }
        }

        if !improved_this_pass {
            termination = Termination::Converged;
            break;
        }
    }

    if improvements > 0 {
        log::debug!("2-opt applied {improvements} reversals in {passes} passes");
    }

    TwoOptOutcome {
        route: Route::new(order),
        passes,
        improvements,
        termination,
    }
}

/// Reversing everything but the anchor (closed) or the whole path (open)
/// only flips direction.
fn skip_full_reversal(closed: bool, s: usize, e: usize, n: usize) -> bool {
    if closed {
        s == 1 && e == n - 1
    } else {
        s == 0 && e == n - 1
    }
}

/// Cost change from reversing `order[s..=e]`.
fn reversal_delta(order: &[usize], scorer: &Scorer<'_>, s: usize, e: usize) -> f64 {
    let m = scorer.matrix();
    let n = order.len();
    let prev = if s > 0 {
        Some(order[s - 1])
    } else if scorer.is_closed() {
        Some(order[n - 1])
    } else {
        None
    };
    let next = if e + 1 < n {
        Some(order[e + 1])
    } else if scorer.is_closed() {
        Some(order[0])
    } else {
        None
    };

    let (first, last) = (order[s], order[e]);
    let mut delta = 0.0;
    if let Some(p) = prev {
        delta += m.get(p, last) - m.get(p, first);
    }
    if let Some(q) = next {
        delta += m.get(first, q) - m.get(last, q);
    }
    if !m.is_symmetric() {
        for w in order[s..=e].windows(2) {
            delta += m.get(w[1], w[0]) - m.get(w[0], w[1]);
        }
    }
    delta
}
