//! Core trait and member type for the NSGA-II engine.

use rand::Rng;

use crate::error::Result;

/// Defines a multi-objective problem. Every objective is minimized.
pub trait MoProblem: Send + Sync {
    /// The solution representation type.
    type Solution: Clone + Send + Sync;

    /// Number of objectives each evaluation returns. Must be at least 1.
    fn objective_count(&self) -> usize;

    /// Creates the `index`-th member of the initial population.
    fn create_solution<R: Rng>(&self, index: usize, rng: &mut R) -> Self::Solution;

    /// Evaluates every objective for a solution.
    ///
    /// # Errors
    ///
    /// Any error aborts the run and is returned to the caller.
    fn evaluate(&self, solution: &Self::Solution) -> Result<Vec<f64>>;

    /// Recombines two parents into one or two offspring. The default
    /// clones `parent1`.
    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Solution,
        _parent2: &Self::Solution,
        _rng: &mut R,
    ) -> Vec<Self::Solution> {
        vec![parent1.clone()]
    }

    /// Perturbs an offspring in place. The default is a no-op.
    fn mutate<R: Rng>(&self, _solution: &mut Self::Solution, _rng: &mut R) {}

    /// Called after every completed generation with the members of front 0.
    fn on_generation(&self, _generation: usize, _front: &[&MoSolution<Self::Solution>]) {}
}

/// A population member: a solution, its objective vector and its position
/// in the current ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct MoSolution<S> {
    /// The solution.
    pub solution: S,
    /// Objective values, in the problem's objective order.
    pub objectives: Vec<f64>,
    /// Pareto rank (0 = non-dominated).
    pub rank: usize,
    /// Crowding distance within its front.
    pub crowding: f64,
}

impl<S> MoSolution<S> {
    /// Wraps an evaluated solution. Rank and crowding are filled in by the
    /// next ranking pass.
    pub fn new(solution: S, objectives: Vec<f64>) -> Self {
        Self {
            solution,
            objectives,
            rank: usize::MAX,
            crowding: 0.0,
        }
    }

    /// Crowded-comparison order: lower rank first, then larger crowding.
    pub fn crowded_better(&self, other: &Self) -> bool {
        self.rank < other.rank || (self.rank == other.rank && self.crowding > other.crowding)
    }
}
