//! Annealing parameters: temperatures, cooling, reheating.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, RouteError};

/// How the temperature drops after each step.
///
/// Lundy & Mees (1986), "Convergence of an annealing algorithm",
/// *Mathematical Programming* 34, 111-124.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CoolingSchedule {
    /// `T' = alpha * T`.
    Geometric {
        /// In (0, 1); closer to 1 cools more slowly.
        alpha: f64,
    },

    /// `T' = T - (T0 - Tmin) / steps`.
    ///
    /// `steps` is `max_iterations / iterations_per_temperature` when an
    /// iteration limit is set, otherwise 1000.
    Linear,

    /// `T' = T / (1 + beta * T)`.
    ///
    /// One iteration per temperature step.
    LundyMees {
        /// `(T0 - Tmin) / (max_iterations * T0 * Tmin)` reaches `Tmin`
        /// after exactly `max_iterations` steps.
        beta: f64,
    },
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Geometric { alpha: 0.995 }
    }
}

/// Temperature boost applied after a run of non-improving steps.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reheat {
    /// Temperature steps without a new best before reheating.
    pub after_steps: usize,
    /// Multiplier applied to the current temperature (> 1). The result is
    /// capped at the initial temperature.
    pub factor: f64,
    /// Upper bound on reheats per run, so the schedule still reaches the
    /// temperature floor.
    pub max_reheats: usize,
}

/// Simulated annealing parameters.
///
/// # Examples
///
/// ```
/// use u_routeopt::sa::{CoolingSchedule, Reheat, SaConfig};
///
/// let config = SaConfig::default()
///     .with_initial_temperature(50.0)
///     .with_min_temperature(0.01)
///     .with_cooling(CoolingSchedule::Geometric { alpha: 0.98 })
///     .with_iterations_per_temperature(200)
///     .with_reheat(Reheat { after_steps: 40, factor: 4.0, max_reheats: 5 });
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SaConfig {
    /// Starting temperature. Must exceed `min_temperature`.
    pub initial_temperature: f64,

    /// Termination floor. Strictly positive so the acceptance probability
    /// never divides by zero.
    pub min_temperature: f64,

    /// Cooling schedule.
    pub cooling: CoolingSchedule,

    /// Neighbors tried per temperature step. `LundyMees` always uses 1.
    pub iterations_per_temperature: usize,

    /// Maximum total iterations. 0 = no limit.
    pub max_iterations: usize,

    /// Optional reheating on stagnation.
    pub reheat: Option<Reheat>,

    /// Number of temperature samples kept in the result trace.
    pub trace_capacity: usize,

    /// Fixed seed; `None` draws one.
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            min_temperature: 1e-3,
            cooling: CoolingSchedule::default(),
            iterations_per_temperature: 100,
            max_iterations: 0,
            reheat: None,
            trace_capacity: 64,
            seed: None,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    /// Shorthand for geometric cooling with the given rate.
    pub fn with_cooling_rate(self, alpha: f64) -> Self {
        self.with_cooling(CoolingSchedule::Geometric { alpha })
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_reheat(mut self, reheat: Reheat) -> Self {
        self.reheat = Some(reheat);
        self
    }

    pub fn with_trace_capacity(mut self, n: usize) -> Self {
        self.trace_capacity = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// [`RouteError::Configuration`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if !is_positive(self.initial_temperature) {
            return Err(RouteError::config("initial_temperature must be positive"));
        }
        if !is_positive(self.min_temperature) {
            return Err(RouteError::config("min_temperature must be positive"));
        }
        if self.min_temperature >= self.initial_temperature {
            return Err(RouteError::config(
                "min_temperature must be less than initial_temperature",
            ));
        }
        if self.iterations_per_temperature == 0 {
            return Err(RouteError::config(
                "iterations_per_temperature must be at least 1",
            ));
        }
        match self.cooling {
            CoolingSchedule::Geometric { alpha } => {
                if !(alpha > 0.0 && alpha < 1.0) {
                    return Err(RouteError::config(format!(
                        "cooling_rate must be in (0, 1), got {alpha}"
                    )));
                }
            }
            CoolingSchedule::LundyMees { beta } => {
                if !is_positive(beta) {
                    return Err(RouteError::config(format!(
                        "lundy-mees beta must be positive, got {beta}"
                    )));
                }
            }
            CoolingSchedule::Linear => {}
        }
        if let Some(reheat) = self.reheat {
            if reheat.after_steps == 0 {
                return Err(RouteError::config("reheat after_steps must be at least 1"));
            }
            if !(reheat.factor.is_finite() && reheat.factor > 1.0) {
                return Err(RouteError::config(format!(
                    "reheat factor must be greater than 1, got {}",
                    reheat.factor
                )));
            }
        }
        Ok(())
    }
}

fn is_positive(x: f64) -> bool {
    x.is_finite() && x > 0.0
}
