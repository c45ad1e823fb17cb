//! Core traits for the GA engine.
//!
//! [`Individual`] and [`GaProblem`] form the contract between the generic
//! evolutionary loop in [`GaRunner`](super::GaRunner) and the route problem
//! that plugs into it. Fitness is an `f64` cost: lower is better.

use rand::Rng;

use crate::model::Route;

/// A candidate solution carrying its own fitness.
pub trait Individual: Clone + Send + Sync {
    /// Current fitness (cost). `f64::INFINITY` until evaluated.
    fn fitness(&self) -> f64;

    /// Stores the fitness computed by [`GaProblem::evaluate`].
    fn set_fitness(&mut self, fitness: f64);
}

/// A route plus its fitness.
///
/// Every candidate owns its route buffer; crossover and mutation always
/// work on fresh copies, so parents and elites are never aliased.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// The visiting order.
    pub route: Route,
    /// Route cost once evaluated.
    pub fitness: f64,
}

impl Candidate {
    /// Wraps an unevaluated route.
    pub fn new(route: Route) -> Self {
        Self {
            route,
            fitness: f64::INFINITY,
        }
    }
}

impl Individual for Candidate {
    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

/// Defines a GA optimization problem.
///
/// `GaProblem` must be `Send + Sync` because the runner may evaluate a
/// generation on the rayon pool.
pub trait GaProblem: Send + Sync {
    /// The individual type.
    type Individual: Individual;

    /// Creates the `index`-th member of the initial population.
    ///
    /// The index lets a problem seed a few slots with constructed solutions
    /// and fill the rest randomly.
    fn create_individual<R: Rng>(&self, index: usize, rng: &mut R) -> Self::Individual;

    /// Computes the fitness of an individual. Must be pure.
    fn evaluate(&self, individual: &Self::Individual) -> f64;

    /// Recombines two parents into one or two offspring.
    ///
    /// The default clones `parent1`.
    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Individual,
        _parent2: &Self::Individual,
        _rng: &mut R,
    ) -> Vec<Self::Individual> {
        vec![parent1.clone()]
    }

    /// Perturbs an offspring in place. The default is a no-op.
    fn mutate<R: Rng>(&self, _individual: &mut Self::Individual, _rng: &mut R) {}

    /// Post-processes the best individual once the loop ends.
    ///
    /// The runner re-evaluates the result and keeps whichever is better.
    /// The default returns it unchanged.
    fn refine(&self, best: Self::Individual) -> Self::Individual {
        best
    }

    /// Called after every completed generation.
    fn on_generation(&self, _generation: usize, _best_fitness: f64) {}
}
