//! GA configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::operators::{Crossover, Mutation};
use super::selection::Selection;
use crate::error::{Result, RouteError};

/// Configuration for the genetic algorithm.
///
/// # Defaults
///
/// ```
/// use u_routeopt::ga::{GaConfig, Selection};
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.max_generations, 500);
/// assert_eq!(config.elitism_count, 2);
/// assert_eq!(config.selection, Selection::Tournament(3));
/// ```
///
/// # Builder
///
/// ```
/// use u_routeopt::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_max_generations(50)
///     .with_tournament_size(4)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GaConfig {
    /// Individuals per generation. Must be at least 2.
    pub population_size: usize,

    /// Generation allowance.
    pub max_generations: usize,

    /// Parent selection strategy.
    pub selection: Selection,

    /// Individuals copied unchanged into the next generation.
    pub elitism_count: usize,

    /// Probability of recombining a parent pair (otherwise a parent is cloned).
    pub crossover_rate: f64,

    /// Probability of mutating each offspring.
    pub mutation_rate: f64,

    /// Recombination operator.
    pub crossover: Crossover,

    /// Mutation operator.
    pub mutation: Mutation,

    /// Generations without meaningful improvement before stopping early.
    ///
    /// Also fixes the size of the convergence window (`limit + 1` values).
    /// 0 disables early stopping.
    pub stagnation_limit: usize,

    /// Relative improvement across the window below which the run counts
    /// as converged.
    pub convergence_epsilon: f64,

    /// Evaluate offspring on the rayon pool. Does not change results.
    pub parallel: bool,

    /// Random seed. `None` draws one.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 500,
            selection: Selection::default(),
            elitism_count: 2,
            crossover_rate: 0.9,
            mutation_rate: 0.2,
            crossover: Crossover::default(),
            mutation: Mutation::default(),
            stagnation_limit: 30,
            convergence_epsilon: 1e-9,
            parallel: true,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the generation allowance.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Shorthand for `with_selection(Selection::Tournament(k))`.
    pub fn with_tournament_size(self, k: usize) -> Self {
        self.with_selection(Selection::Tournament(k))
    }

    /// Sets the number of elites.
    pub fn with_elitism_count(mut self, n: usize) -> Self {
        self.elitism_count = n;
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the crossover operator.
    pub fn with_crossover(mut self, op: Crossover) -> Self {
        self.crossover = op;
        self
    }

    /// Sets the mutation operator.
    pub fn with_mutation(mut self, op: Mutation) -> Self {
        self.mutation = op;
        self
    }

    /// Sets the stagnation limit (0 disables).
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Sets the convergence epsilon.
    pub fn with_convergence_epsilon(mut self, eps: f64) -> Self {
        self.convergence_epsilon = eps;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Small population, short run. For interactive requests.
    pub fn fast() -> Self {
        Self {
            population_size: 40,
            max_generations: 150,
            stagnation_limit: 20,
            ..Self::default()
        }
    }

    /// The defaults.
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Large population, long run.
    pub fn quality() -> Self {
        Self {
            population_size: 200,
            max_generations: 1500,
            stagnation_limit: 80,
            ..Self::default()
        }
    }

    /// Picks a preset from the number of stops.
    ///
    /// - fewer than 30 stops: [`fast`](Self::fast)
    /// - 30 to 149: [`balanced`](Self::balanced)
    /// - 150 or more: [`quality`](Self::quality)
    pub fn auto_select(stop_count: usize) -> Self {
        if stop_count < 30 {
            Self::fast()
        } else if stop_count < 150 {
            Self::balanced()
        } else {
            Self::quality()
        }
    }

    /// Validates the configuration.
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
        if let Selection::Tournament(k) = self.selection {
            if k == 0 {
                return Err(RouteError::config("tournament_size must be at least 1"));
            }
            if k > self.population_size {
                return Err(RouteError::config(format!(
                    "tournament_size {k} exceeds population_size {}",
                    self.population_size
                )));
            }
        }
        if self.elitism_count >= self.population_size {
            return Err(RouteError::config(
                "elitism_count must be smaller than population_size",
            ));
        }
        check_rate("crossover_rate", self.crossover_rate)?;
        check_rate("mutation_rate", self.mutation_rate)?;
        if !self.convergence_epsilon.is_finite() || self.convergence_epsilon < 0.0 {
            return Err(RouteError::config("convergence_epsilon must be non-negative"));
        }
        Ok(())
    }
}

pub(crate) fn check_rate(name: &str, rate: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&rate) {
        return Err(RouteError::config(format!(
            "{name} must be within [0, 1], got {rate}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(GaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_population_too_small() {
        let err = GaConfig::default().with_population_size(1).validate();
        assert!(matches!(err, Err(RouteError::Configuration(_))));
    }

    #[test]
    fn test_tournament_larger_than_population() {
        let config = GaConfig::default()
            .with_population_size(4)
            .with_elitism_count(1)
            .with_tournament_size(5);
        assert!(config.validate().is_err());
        assert!(config.with_tournament_size(4).validate().is_ok());
    }

    #[test]
    fn test_zero_tournament() {
        assert!(GaConfig::default().with_tournament_size(0).validate().is_err());
    }

    #[test]
    fn test_elites_fill_population() {
        let config = GaConfig::default()
            .with_population_size(5)
            .with_tournament_size(2)
            .with_elitism_count(5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rates_out_of_range() {
        assert!(GaConfig::default().with_crossover_rate(1.5).validate().is_err());
        assert!(GaConfig::default().with_mutation_rate(-0.1).validate().is_err());
        assert!(GaConfig::default().with_mutation_rate(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_zero_generations() {
        assert!(GaConfig::default().with_max_generations(0).validate().is_err());
    }

    #[test]
    fn test_presets_validate() {
        for config in [GaConfig::fast(), GaConfig::balanced(), GaConfig::quality()] {
            assert!(config.validate().is_ok());
        }
        assert_eq!(GaConfig::auto_select(10), GaConfig::fast());
        assert_eq!(GaConfig::auto_select(30), GaConfig::balanced());
        assert_eq!(GaConfig::auto_select(500), GaConfig::quality());
    }
}
