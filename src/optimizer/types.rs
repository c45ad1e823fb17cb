//! Optimization results and diagnostics.

use std::collections::BTreeMap;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::config::Strategy;
use crate::budget::Termination;
use crate::sa::TemperatureSample;

/// Engine-specific statistics of a run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Diagnostics {
    /// Zero or one stop; no engine ran.
    Trivial,
    /// The budget ran out while travel costs were being gathered; no
    /// engine ran and the route was never costed.
    Unevaluated,
    Genetic {
        generations: usize,
        best_generation: usize,
        evaluations: usize,
        /// Best cost after each of the last few generations.
        recent_best: Vec<f64>,
    },
    Annealing {
        iterations: usize,
        temperature_steps: usize,
        final_temperature: f64,
        accepted_moves: usize,
        improving_moves: usize,
        reheats: usize,
        best_iteration: usize,
        /// The last few temperature steps.
        temperature_trace: Vec<TemperatureSample>,
    },
    MultiObjective {
        generations: usize,
        evaluations: usize,
        front_size: usize,
        /// Front-0 size after each of the last few generations.
        front_sizes: Vec<usize>,
    },
    TwoOpt {
        passes: usize,
        improvements: usize,
    },
}

impl Diagnostics {
    /// Scalar statistics keyed by name. Traces are summarized by length.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        let entries: Vec<(&str, f64)> = match self {
            Diagnostics::Trivial | Diagnostics::Unevaluated => Vec::new(),
            Diagnostics::Genetic {
                generations,
                best_generation,
                evaluations,
                recent_best,
            } => vec![
                ("generations", *generations as f64),
                ("convergence_generation", *best_generation as f64),
                ("evaluations", *evaluations as f64),
                ("history_len", recent_best.len() as f64),
            ],
            Diagnostics::Annealing {
                iterations,
                temperature_steps,
                final_temperature,
                accepted_moves,
                improving_moves,
                reheats,
                best_iteration,
                temperature_trace,
            } => vec![
                ("iterations", *iterations as f64),
                ("temperature_steps", *temperature_steps as f64),
                ("final_temperature", *final_temperature),
                ("accepted_moves", *accepted_moves as f64),
                ("improving_moves", *improving_moves as f64),
                ("reheats", *reheats as f64),
                ("convergence_iteration", *best_iteration as f64),
                ("history_len", temperature_trace.len() as f64),
            ],
            Diagnostics::MultiObjective {
                generations,
                evaluations,
                front_size,
                front_sizes,
            } => vec![
                ("generations", *generations as f64),
                ("evaluations", *evaluations as f64),
                ("front_size", *front_size as f64),
                ("history_len", front_sizes.len() as f64),
            ],
            Diagnostics::TwoOpt {
                passes,
                improvements,
            } => vec![
                ("passes", *passes as f64),
                ("improvements", *improvements as f64),
            ],
        };
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }
}

/// One member of a returned Pareto front.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParetoSolution {
    /// Stop ids in visiting order.
    pub route_ids: Vec<String>,
    /// Indices into the input stops, in visiting order.
    pub order: Vec<usize>,
    /// Objective values, in the configured objective order.
    pub objectives: Vec<f64>,
}

/// The outcome of one optimization run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OptimizationResult {
    /// Stop ids in visiting order.
    pub route_ids: Vec<String>,
    /// Indices into the input stops, in visiting order.
    pub order: Vec<usize>,
    /// Cost of the returned route.
    ///
    /// The three costs are NaN when the run stopped before the cost matrix
    /// was complete ([`Diagnostics::Unevaluated`]).
    pub cost: f64,
    /// Cost of the stops in input order.
    pub baseline_cost: f64,
    /// Cost of the route the engine started from.
    pub initial_cost: f64,
    /// Improvement of `cost` over `baseline_cost`, in percent.
    pub improvement_percent: f64,
    /// Wall-clock time of the whole run.
    pub processing_time: Duration,
    /// The engine that produced the route.
    pub strategy: Strategy,
    /// Why the engine stopped.
    pub termination: Termination,
    /// Engine statistics.
    pub diagnostics: Diagnostics,
    /// Pareto front for the multi-objective strategy, empty otherwise.
    /// The returned route is its best compromise member.
    pub pareto_front: Vec<ParetoSolution>,
}

impl OptimizationResult {
    /// Returns `true` if the wall-clock budget cut the run short.
    pub fn budget_exceeded(&self) -> bool {
        self.termination == Termination::BudgetExceeded
    }

    /// Processing time in seconds.
    pub fn processing_seconds(&self) -> f64 {
        self.processing_time.as_secs_f64()
    }

    /// Flat diagnostics for reporting layers: the engine statistics plus
    /// `processing_time_seconds`, `improvement_percent`, `budget_exceeded`
    /// and `cancelled` (0 or 1).
    pub fn diagnostics_map(&self) -> BTreeMap<String, f64> {
        let mut map = self.diagnostics.to_map();
        map.insert("processing_time_seconds".into(), self.processing_seconds());
        map.insert("improvement_percent".into(), self.improvement_percent);
        map.insert("budget_exceeded".into(), flag(self.budget_exceeded()));
        map.insert(
            "cancelled".into(),
            flag(self.termination == Termination::Cancelled),
        );
        if !self.pareto_front.is_empty() {
            map.insert("pareto_front_size".into(), self.pareto_front.len() as f64);
        }
        map
    }
}

fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}
