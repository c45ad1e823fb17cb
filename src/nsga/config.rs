//! NSGA-II configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, RouteError};
use crate::ga::check_rate;

/// Configuration for the NSGA-II engine.
///
/// ```
/// use u_routeopt::nsga::NsgaConfig;
///
/// let config = NsgaConfig::default()
///     .with_population_size(40)
///     .with_max_generations(80)
///     .with_compromise_weights(vec![2.0, 1.0])
///     .with_seed(3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NsgaConfig {
    /// Parent population size, restored after every (μ+λ) selection.
    pub population_size: usize,

    /// Generation allowance.
    pub max_generations: usize,

    /// Probability of recombining a parent pair.
    pub crossover_rate: f64,

    /// Probability of mutating each offspring.
    pub mutation_rate: f64,

    /// Crowded-comparison tournament size.
    pub tournament_size: usize,

    /// Stop once the front-0 size has not changed for this many
    /// generations. 0 disables.
    pub stall_generations: usize,

    /// Per-objective weights for the best-compromise pick. Empty means
    /// equal weights; otherwise one non-negative weight per objective.
    pub compromise_weights: Vec<f64>,

    /// Evaluate offspring on the rayon pool. Does not change results.
    pub parallel: bool,

    /// Random seed. `None` draws one.
    pub seed: Option<u64>,
}

impl Default for NsgaConfig {
    fn default() -> Self {
        Self {
            population_size: 60,
            max_generations: 200,
            crossover_rate: 0.9,
            mutation_rate: 0.2,
            tournament_size: 2,
            stall_generations: 25,
            compromise_weights: Vec::new(),
            parallel: true,
            seed: None,
        }
    }
}

impl NsgaConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    pub fn with_stall_generations(mut self, n: usize) -> Self {
        self.stall_generations = n;
        self
    }

    pub fn with_compromise_weights(mut self, weights: Vec<f64>) -> Self {
        self.compromise_weights = weights;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// The weight count is checked against the objective count when a run
    /// starts.
    ///
    /// # Errors
    ///
    /// [`RouteError::Configuration`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(RouteError::config("population_size must be at least 2"));
        }
        if self.max_generations == 0 {
            return Err(RouteError::config("generations must be at least 1"));
        }
        if self.tournament_size == 0 || self.tournament_size > self.population_size {
            return Err(RouteError::config(format!(
                "tournament_size must be within 1..={}, got {}",
                self.population_size, self.tournament_size
            )));
        }
        check_rate("crossover_rate", self.crossover_rate)?;
        check_rate("mutation_rate", self.mutation_rate)?;
        if self
            .compromise_weights
            .iter()
            .any(|w| !w.is_finite() || *w < 0.0)
        {
            return Err(RouteError::config("compromise weights must be non-negative"));
        }
        if !self.compromise_weights.is_empty() && self.compromise_weights.iter().all(|w| *w == 0.0) {
            return Err(RouteError::config("compromise weights must not all be zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = NsgaConfig::default();
        assert_eq!(config.population_size, 60);
        assert_eq!(config.tournament_size, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_population_and_tournament() {
        assert!(NsgaConfig::default().with_population_size(1).validate().is_err());
        assert!(NsgaConfig::default().with_tournament_size(0).validate().is_err());
        assert!(NsgaConfig::default()
            .with_population_size(4)
            .with_tournament_size(5)
            .validate()
            .is_err());
    }

    #[test]
    fn test_invalid_weights() {
        let negative = NsgaConfig::default().with_compromise_weights(vec![1.0, -1.0]);
        assert!(negative.validate().is_err());
        let zero = NsgaConfig::default().with_compromise_weights(vec![0.0, 0.0]);
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_invalid_rates() {
        assert!(NsgaConfig::default().with_mutation_rate(2.0).validate().is_err());
        assert!(NsgaConfig::default().with_max_generations(0).validate().is_err());
    }
}
