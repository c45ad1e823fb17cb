//! Strategy selection and facade configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::construction::InitialRoute;
use crate::error::{Result, RouteError};
use crate::ga::GaConfig;
use crate::local_search::TwoOptConfig;
use crate::nsga::NsgaConfig;
use crate::objectives::Objective;
use crate::sa::{NeighborMove, SaConfig};

/// The optimization engine to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Strategy {
    /// Genetic algorithm followed by 2-opt on the best route.
    #[default]
    Genetic,
    /// Simulated annealing followed by 2-opt on the best route.
    SimulatedAnnealing,
    /// NSGA-II over the configured objectives.
    MultiObjective,
    /// 2-opt alone, starting from the initial route.
    TwoOpt,
}

impl Strategy {
    /// Stable identifier accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Genetic => "genetic",
            Strategy::SimulatedAnnealing => "simulated_annealing",
            Strategy::MultiObjective => "multi_objective",
            Strategy::TwoOpt => "two_opt",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = RouteError;

    /// Accepts the stable identifiers plus a few common spellings
    /// (`annealing`, `nsga2`, `2opt`). Case and `-`/`_` are ignored.
    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        match key.as_str() {
            "genetic" | "ga" => Ok(Strategy::Genetic),
            "simulated_annealing" | "annealing" | "sa" => Ok(Strategy::SimulatedAnnealing),
            "multi_objective" | "nsga2" | "nsga_ii" => Ok(Strategy::MultiObjective),
            "two_opt" | "2opt" | "2_opt" => Ok(Strategy::TwoOpt),
            _ => Err(RouteError::config(format!("unknown strategy '{}'", s.trim()))),
        }
    }
}

/// Everything the facade needs to run one strategy.
///
/// Engine sections are plain engine configs; only the section of the
/// selected strategy (plus `two_opt`, used for polishing) is validated.
///
/// ```
/// use std::time::Duration;
/// use u_routeopt::optimizer::{OptimizerConfig, Strategy};
///
/// let config = OptimizerConfig::default()
///     .with_strategy(Strategy::SimulatedAnnealing)
///     .with_max_duration(Duration::from_millis(200))
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OptimizerConfig {
    /// Engine to run.
    pub strategy: Strategy,

    /// Genetic algorithm parameters. Its operators are also used by the
    /// multi-objective engine.
    pub ga: GaConfig,

    /// Simulated annealing parameters.
    pub sa: SaConfig,

    /// NSGA-II parameters.
    pub nsga: NsgaConfig,

    /// 2-opt parameters, for the 2-opt strategy and for polishing.
    pub two_opt: TwoOptConfig,

    /// Neighborhood move used by simulated annealing.
    pub neighbor_move: NeighborMove,

    /// Ordered objectives for the multi-objective engine.
    pub objectives: Vec<Objective>,

    /// Hard wall-clock budget for the whole run.
    pub max_duration: Option<Duration>,

    /// Count the leg from the last stop back to the first.
    pub closed_tour: bool,

    /// How the starting route is built.
    pub initial_route: InitialRoute,

    /// Refine the GA/SA result with 2-opt.
    pub polish: bool,

    /// Time units per unit of travel cost, for time-window objectives.
    pub travel_time_factor: f64,

    /// Seed applied to every engine, overriding the engine sections.
    pub seed: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            ga: GaConfig::default(),
            sa: SaConfig::default(),
            nsga: NsgaConfig::default(),
            two_opt: TwoOptConfig::default(),
            neighbor_move: NeighborMove::default(),
            objectives: vec![
                Objective::Distance,
                Objective::TimeWindowViolation,
                Objective::LoadBalance,
            ],
            max_duration: None,
            closed_tour: true,
            initial_route: InitialRoute::default(),
            polish: true,
            travel_time_factor: 1.0,
            seed: None,
        }
    }
}

impl OptimizerConfig {
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_ga(mut self, ga: GaConfig) -> Self {
        self.ga = ga;
        self
    }

    pub fn with_sa(mut self, sa: SaConfig) -> Self {
        self.sa = sa;
        self
    }

    pub fn with_nsga(mut self, nsga: NsgaConfig) -> Self {
        self.nsga = nsga;
        self
    }

    pub fn with_two_opt(mut self, two_opt: TwoOptConfig) -> Self {
        self.two_opt = two_opt;
        self
    }

    pub fn with_neighbor_move(mut self, neighbor_move: NeighborMove) -> Self {
        self.neighbor_move = neighbor_move;
        self
    }

    pub fn with_objectives(mut self, objectives: Vec<Objective>) -> Self {
        self.objectives = objectives;
        self
    }

    /// Parses objective identifiers such as `"distance"` or `"time_window"`.
    ///
    /// # Errors
    ///
    /// [`RouteError::Configuration`] for an unknown identifier.
    pub fn with_objective_ids<S: AsRef<str>>(mut self, ids: &[S]) -> Result<Self> {
        self.objectives = ids
            .iter()
            .map(|id| id.as_ref().parse())
            .collect::<Result<Vec<Objective>>>()?;
        Ok(self)
    }

    pub fn with_max_duration(mut self, limit: Duration) -> Self {
        self.max_duration = Some(limit);
        self
    }

    /// Sets the budget from seconds, as received from an external caller.
    ///
    /// # Errors
    ///
    /// [`RouteError::Configuration`] for a negative, NaN or overflowing
    /// value.
    pub fn with_max_duration_secs(mut self, seconds: f64) -> Result<Self> {
        let limit = Duration::try_from_secs_f64(seconds).map_err(|e| {
            RouteError::config(format!("max_duration_seconds {seconds} is invalid: {e}"))
        })?;
        self.max_duration = Some(limit);
        Ok(self)
    }

    pub fn with_closed_tour(mut self, closed: bool) -> Self {
        self.closed_tour = closed;
        self
    }

    pub fn with_initial_route(mut self, initial: InitialRoute) -> Self {
        self.initial_route = initial;
        self
    }

    pub fn with_polish(mut self, polish: bool) -> Self {
        self.polish = polish;
        self
    }

    pub fn with_travel_time_factor(mut self, factor: f64) -> Self {
        self.travel_time_factor = factor;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the sections the selected strategy will use.
    ///
    /// # Errors
    ///
    /// [`RouteError::Configuration`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        self.two_opt.validate()?;
        if !(self.travel_time_factor.is_finite() && self.travel_time_factor >= 0.0) {
            return Err(RouteError::config(format!(
                "travel_time_factor must be non-negative, got {}",
                self.travel_time_factor
            )));
        }
        match self.strategy {
            Strategy::Genetic => self.ga.validate(),
            Strategy::SimulatedAnnealing => self.sa.validate(),
            Strategy::TwoOpt => Ok(()),
            Strategy::MultiObjective => {
                self.nsga.validate()?;
                if self.objectives.is_empty() {
                    return Err(RouteError::config(
                        "multi-objective optimization needs at least one objective",
                    ));
                }
                for (i, objective) in self.objectives.iter().enumerate() {
                    if self.objectives[..i].contains(objective) {
                        return Err(RouteError::config(format!(
                            "objective '{objective}' is listed twice"
                        )));
                    }
                }
                if !self.nsga.compromise_weights.is_empty()
                    && self.nsga.compromise_weights.len() != self.objectives.len()
                {
                    return Err(RouteError::config(format!(
                        "{} compromise weights given for {} objectives",
                        self.nsga.compromise_weights.len(),
                        self.objectives.len()
                    )));
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_identifiers() {
        for s in [
            Strategy::Genetic,
            Strategy::SimulatedAnnealing,
            Strategy::MultiObjective,
            Strategy::TwoOpt,
        ] {
            assert_eq!(s.as_str().parse::<Strategy>().unwrap(), s);
        }
        assert_eq!("Annealing".parse::<Strategy>().unwrap(), Strategy::SimulatedAnnealing);
        assert_eq!("two-opt".parse::<Strategy>().unwrap(), Strategy::TwoOpt);
        assert!(matches!(
            "tabu".parse::<Strategy>(),
            Err(RouteError::Configuration(_))
        ));
    }

    #[test]
    fn test_default_validates() {
        assert!(OptimizerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_only_selected_engine_is_validated() {
        let bad_sa = SaConfig::default().with_cooling_rate(1.2);
        let config = OptimizerConfig::default().with_sa(bad_sa);
        assert!(config.validate().is_ok());
        assert!(config
            .with_strategy(Strategy::SimulatedAnnealing)
            .validate()
            .is_err());
    }

    #[test]
    fn test_multi_objective_requires_objectives() {
        let config = OptimizerConfig::default()
            .with_strategy(Strategy::MultiObjective)
            .with_objectives(Vec::new());
        assert!(matches!(config.validate(), Err(RouteError::Configuration(_))));

        let dup = OptimizerConfig::default()
            .with_strategy(Strategy::MultiObjective)
            .with_objectives(vec![Objective::Distance, Objective::Distance]);
        assert!(dup.validate().is_err());
    }

    #[test]
    fn test_objective_ids() {
        let config = OptimizerConfig::default()
            .with_objective_ids(&["distance", "priority"])
            .unwrap();
        assert_eq!(
            config.objectives,
            vec![Objective::Distance, Objective::PriorityDelay]
        );
        assert!(OptimizerConfig::default().with_objective_ids(&["speed"]).is_err());
    }

    #[test]
    fn test_duration_seconds() {
        let config = OptimizerConfig::default().with_max_duration_secs(0.25).unwrap();
        assert_eq!(config.max_duration, Some(Duration::from_millis(250)));
        assert!(OptimizerConfig::default().with_max_duration_secs(-1.0).is_err());
        assert!(OptimizerConfig::default().with_max_duration_secs(f64::NAN).is_err());
    }

    #[test]
    fn test_tournament_larger_than_population() {
        let ga = GaConfig::default()
            .with_population_size(4)
            .with_elitism_count(1)
            .with_tournament_size(10);
        assert!(OptimizerConfig::default().with_ga(ga).validate().is_err());
    }

    #[test]
    fn test_bad_travel_time_factor() {
        let config = OptimizerConfig::default().with_travel_time_factor(-2.0);
        assert!(config.validate().is_err());
    }
}
