//! SA execution loop.

use rand::Rng;

use super::config::{CoolingSchedule, SaConfig};
use super::types::{SaProblem, TemperatureSample};
use crate::budget::{Budget, Termination};
use crate::error::Result;
use crate::history::BoundedHistory;
use crate::random::rng_from;

/// Temperature steps assumed for linear cooling without an iteration limit.
const DEFAULT_LINEAR_STEPS: usize = 1000;

/// Outcome of an annealing run.
#[derive(Debug, Clone)]
pub struct SaResult<S: Clone> {
    /// The best solution seen over the whole trajectory.
    pub best: S,

    /// `problem.cost(&best)`.
    pub best_cost: f64,

    /// Cost of the starting solution.
    pub initial_cost: f64,

    /// Neighbors evaluated.
    pub iterations: usize,

    /// Completed temperature steps.
    pub temperature_steps: usize,

    /// Temperature at exit.
    pub final_temperature: f64,

    /// Moves accepted, improving or not.
    pub accepted_moves: usize,

    /// Moves that lowered the current cost.
    pub improving_moves: usize,

    /// Number of reheats performed.
    pub reheats: usize,

    /// Iteration at which `best` was found (0 = the starting solution).
    pub best_iteration: usize,

    /// Why the loop stopped.
    pub termination: Termination,

    /// The last few temperature steps, oldest first.
    pub trace: Vec<TemperatureSample>,
}

/// Drives a [`SaProblem`] through the cooling schedule.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA without a time limit.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` does not validate.
    pub fn run<P: SaProblem>(problem: &P, config: &SaConfig) -> Result<SaResult<P::Solution>> {
        Self::run_with_budget(problem, config, &Budget::unlimited())
    }

    /// Runs SA until the temperature floor, the iteration limit or the
    /// budget stops it. The budget is checked before every iteration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` does not validate.
    pub fn run_with_budget<P: SaProblem>(
        problem: &P,
        config: &SaConfig,
        budget: &Budget,
    ) -> Result<SaResult<P::Solution>> {
        config.validate()?;

        let mut rng = rng_from(config.seed);

        let mut current = problem.initial_solution(&mut rng);
        let mut current_cost = problem.cost(&current);
        let initial_cost = current_cost;
        let mut best = current.clone();
        let mut best_cost = current_cost;

        let mut temperature = config.initial_temperature;
        let linear_delta = linear_delta(config);
        let inner_iters = match config.cooling {
            CoolingSchedule::LundyMees { .. } => 1,
            _ => config.iterations_per_temperature,
        };

        let mut iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut reheats = 0usize;
        let mut best_iteration = 0usize;
        let mut step = 0usize;
        let mut steps_since_best = 0usize;
        let mut termination = Termination::Completed;
        let mut trace = BoundedHistory::new(config.trace_capacity);

        'anneal: while temperature > config.min_temperature {
            let mut new_best = false;

            for _ in 0..inner_iters {
                if let Some(reason) = budget.exhausted() {
                    termination = reason;
                    break 'anneal;
                }
                if config.max_iterations > 0 && iterations >= config.max_iterations {
                    break 'anneal;
                }

                let neighbor = problem.neighbor(&current, &mut rng);
                let neighbor_cost = problem.cost(&neighbor);
                let delta = neighbor_cost - current_cost;
                iterations += 1;

                // Metropolis criterion. `temperature` stays above the
                // positive floor, and a NaN delta is always rejected.
                let accept = if delta < 0.0 {
                    improving_moves += 1;
                    true
                } else {
                    rng.random::<f64>() < (-delta / temperature).exp()
                };

                if accept {
                    current = neighbor;
                    current_cost = neighbor_cost;
                    accepted_moves += 1;

                    if current_cost < best_cost {
                        best = current.clone();
                        best_cost = current_cost;
                        best_iteration = iterations;
                        new_best = true;
                    }
                }
            }

            step += 1;
            trace.push(TemperatureSample {
                step,
                temperature,
                best_cost,
            });
            problem.on_step(step, temperature, best_cost);

            steps_since_best = if new_best { 0 } else { steps_since_best + 1 };
            temperature = cool(temperature, config, linear_delta);

            if let Some(reheat) = config.reheat {
                if steps_since_best >= reheat.after_steps && reheats < reheat.max_reheats {
                    temperature = (temperature * reheat.factor).min(config.initial_temperature);
                    steps_since_best = 0;
                    reheats += 1;
                    log::debug!("sa reheat #{reheats} at step {step}: T={temperature:.4}");
                }
            }
        }

        log::debug!(
            "sa finished: iterations={iterations}, steps={step}, best={best_cost:.6}, termination={}",
            termination.as_str()
        );

        Ok(SaResult {
            best,
            best_cost,
            initial_cost,
            iterations,
            temperature_steps: step,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
            reheats,
            best_iteration,
            termination,
            trace: trace.to_vec(),
        })
    }
}

/// Applies the cooling schedule.
fn cool(temperature: f64, config: &SaConfig, linear_delta: f64) -> f64 {
    match config.cooling {
        CoolingSchedule::Geometric { alpha } => temperature * alpha,
        CoolingSchedule::Linear => (temperature - linear_delta).max(config.min_temperature),
        CoolingSchedule::LundyMees { beta } => temperature / (1.0 + beta * temperature),
    }
}

/// Per-step decrement for linear cooling.
fn linear_delta(config: &SaConfig) -> f64 {
    let steps = if config.max_iterations > 0 {
        (config.max_iterations / config.iterations_per_temperature).max(1)
    } else {
        DEFAULT_LINEAR_STEPS
    };
    (config.initial_temperature - config.min_temperature) / steps as f64
}
