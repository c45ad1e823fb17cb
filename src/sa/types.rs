//! Core trait for Simulated Annealing.

use rand::Rng;

/// Defines a Simulated Annealing problem.
///
/// The problem supplies the starting point, the cost function and the
/// neighborhood. The SA framework handles temperature management, the
/// acceptance criterion, cooling and reheating.
///
/// # Minimization
///
/// SA minimizes the cost function. For maximization, negate the cost.
///
/// # References
///
/// Kirkpatrick et al. (1983), Cerny (1985)
pub trait SaProblem: Send + Sync {
    /// The solution representation type.
    type Solution: Clone + Send;

    /// Creates the starting solution.
    fn initial_solution<R: Rng>(&self, rng: &mut R) -> Self::Solution;

    /// Computes the cost of a solution. Lower is better.
    fn cost(&self, solution: &Self::Solution) -> f64;

    /// Generates a neighbor of the current solution.
    ///
    /// The neighborhood must be connected: any solution reachable from any
    /// other via a sequence of moves.
    fn neighbor<R: Rng>(&self, solution: &Self::Solution, rng: &mut R) -> Self::Solution;

    /// Called after each temperature step.
    fn on_step(&self, _step: usize, _temperature: f64, _best_cost: f64) {}
}

/// One entry of the bounded temperature trace.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemperatureSample {
    /// Temperature step index (1-based).
    pub step: usize,
    /// Temperature used during the step.
    pub temperature: f64,
    /// Best cost after the step.
    pub best_cost: f64,
}
