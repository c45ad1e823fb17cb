//! Route cost and improvement scoring.
//!
//! [`Scorer`] turns an ordering into a total travel cost using the run's
//! [`CostMatrix`]. [`improvement_score`] converts a cost into the percentage
//! improvement over a baseline that is reported to callers.

use crate::model::{CostMatrix, Route};

/// Lowest score ever reported. Anything below means the optimizer produced
/// a route more than twice as costly as the baseline.
pub const SCORE_FLOOR: f64 = -100.0;

/// Computes route costs over a cost matrix.
///
/// With `closed` set, the route is a tour and the leg from the last stop
/// back to the first is included.
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    matrix: &'a CostMatrix,
    closed: bool,
}

impl<'a> Scorer<'a> {
    /// Creates a scorer.
    pub fn new(matrix: &'a CostMatrix, closed: bool) -> Self {
        Self { matrix, closed }
    }

    /// The underlying matrix.
    pub fn matrix(&self) -> &'a CostMatrix {
        self.matrix
    }

    /// Whether the return leg is counted.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Total cost of `route`, cached on the route.
    pub fn cost(&self, route: &Route) -> f64 {
        route.cost_or_init(|order| self.cost_of(order))
    }

    /// Total cost of a raw ordering. Empty and single-stop orderings cost 0.
    pub fn cost_of(&self, order: &[usize]) -> f64 {
        if order.len() < 2 {
            return 0.0;
        }
        let path: f64 = order.windows(2).map(|w| self.matrix.get(w[0], w[1])).sum();
        if self.closed {
            path + self.matrix.get(order[order.len() - 1], order[0])
        } else {
            path
        }
    }

    /// Improvement of `route` over `baseline_cost`, in percent.
    pub fn score(&self, route: &Route, baseline_cost: f64) -> f64 {
        improvement_score(self.cost(route), baseline_cost)
    }
}

/// `(baseline - cost) / baseline * 100`, floored at [`SCORE_FLOOR`].
///
/// A zero baseline (empty or degenerate instance) scores 0. A negative
/// score means the optimizer did worse than the baseline; that is logged as
/// a warning since no engine should ever return such a route.
///
/// ```
/// use u_routeopt::scoring::improvement_score;
///
/// assert!((improvement_score(75.0, 100.0) - 25.0).abs() < 1e-12);
/// assert_eq!(improvement_score(0.0, 0.0), 0.0);
/// assert_eq!(improvement_score(500.0, 100.0), -100.0);
/// ```
pub fn improvement_score(cost: f64, baseline_cost: f64) -> f64 {
    let score = relative_improvement(cost, baseline_cost);
    if score < 0.0 {
        log::warn!(
            "route cost {cost:.4} is worse than baseline {baseline_cost:.4} ({score:.2}%)"
        );
    }
    score
}

/// [`improvement_score`] without the warning.
///
/// For routes that may legitimately cost more than the baseline, such as a
/// Pareto compromise that trades distance for other objectives.
pub fn relative_improvement(cost: f64, baseline_cost: f64) -> f64 {
    if baseline_cost.is_nan() || baseline_cost <= 0.0 || !cost.is_finite() {
        return 0.0;
    }
    ((baseline_cost - cost) / baseline_cost * 100.0).max(SCORE_FLOOR)
}
