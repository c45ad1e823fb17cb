//! GA evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates the evolutionary process:
//! initialization → evaluation → selection → crossover → mutation → repeat,
//! polling the run [`Budget`] between offspring.

use rand::Rng;
use rayon::prelude::*;

use super::config::GaConfig;
use super::types::{GaProblem, Individual};
use crate::budget::{Budget, Termination};
use crate::error::Result;
use crate::history::{BoundedHistory, ConvergenceWindow};
use crate::random::rng_from;

/// Number of per-generation best values kept in [`GaResult::recent_best`].
pub const TRACE_CAPACITY: usize = 64;

/// Result of a GA optimization run.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// The best individual found during the entire run.
    pub best: I,

    /// Best fitness value (same as `best.fitness()`).
    pub best_fitness: f64,

    /// Completed generations. A generation interrupted by the budget is
    /// discarded and not counted.
    pub generations: usize,

    /// Generation in which `best` was found (0 = initial population).
    pub best_generation: usize,

    /// Number of fitness evaluations performed.
    pub evaluations: usize,

    /// Why the loop stopped.
    pub termination: Termination,

    /// Best fitness after each of the last few generations, oldest first.
    pub recent_best: Vec<f64>,
}

/// Executes the GA evolutionary loop.
///
/// ```
/// use rand::Rng;
/// use u_routeopt::ga::{Candidate, GaConfig, GaProblem, GaRunner};
/// use u_routeopt::model::Route;
///
/// struct Sorted;
///
/// impl GaProblem for Sorted {
///     type Individual = Candidate;
///
///     fn create_individual<R: Rng>(&self, _index: usize, _rng: &mut R) -> Candidate {
///         Candidate::new(Route::new(vec![2, 1, 0]))
///     }
///
///     fn evaluate(&self, c: &Candidate) -> f64 {
///         c.route.order().iter().enumerate().filter(|&(i, &s)| i != s).count() as f64
///     }
/// }
///
/// let config = GaConfig::default().with_population_size(4).with_max_generations(3).with_seed(1);
/// let result = GaRunner::run(&Sorted, &config).unwrap();
/// assert_eq!(result.best_fitness, 2.0);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA without a time limit.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` does not validate.
    pub fn run<P: GaProblem>(problem: &P, config: &GaConfig) -> Result<GaResult<P::Individual>> {
        Self::run_with_budget(problem, config, &Budget::unlimited())
    }

    /// Runs the GA until the generation allowance, convergence, or the
    /// budget stops it.
    ///
    /// The budget is checked before each generation and before each
    /// offspring, so a deadline is honored even with a large population.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` does not validate.
    pub fn run_with_budget<P: GaProblem>(
        problem: &P,
        config: &GaConfig,
        budget: &Budget,
    ) -> Result<GaResult<P::Individual>> {
        config.validate()?;

        let mut rng = rng_from(config.seed);
        let size = config.population_size;
        let elites = config.elitism_count;

        let mut population: Vec<P::Individual> = (0..size)
            .map(|index| problem.create_individual(index, &mut rng))
            .collect();
        evaluate_population(problem, &mut population, config.parallel);
        let mut evaluations = population.len();

        let mut best = population[best_index(&population)].clone();
        let mut best_generation = 0;
        let mut generations = 0;
        let mut termination = Termination::Completed;

        let mut window = ConvergenceWindow::new(config.stagnation_limit, config.convergence_epsilon);
        let mut recent = BoundedHistory::new(TRACE_CAPACITY);
        window.record(best.fitness());
        recent.push(best.fitness());

        'evolve: for gen in 1..=config.max_generations {
            if let Some(reason) = budget.exhausted() {
                termination = reason;
                break;
            }

            // Best first. Rank selection relies on this order.
            population.sort_by(|a, b| a.fitness().total_cmp(&b.fitness()));

            let mut next_gen: Vec<P::Individual> = Vec::with_capacity(size);
            next_gen.extend_from_slice(&population[..elites]);

            while next_gen.len() < size {
                if let Some(reason) = budget.exhausted() {
                    termination = reason;
                    break 'evolve;
                }

                let p1 = config.selection.select(&population, &mut rng);
                let p2 = config.selection.select(&population, &mut rng);

                let children = if rng.random::<f64>() < config.crossover_rate {
                    problem.crossover(&population[p1], &population[p2], &mut rng)
                } else {
                    vec![population[p1].clone()]
                };

                for mut child in children {
                    if next_gen.len() >= size {
                        break;
                    }
                    if rng.random::<f64>() < config.mutation_rate {
                        problem.mutate(&mut child, &mut rng);
                    }
                    next_gen.push(child);
                }
            }

            // Elites keep their fitness.
            evaluate_population(problem, &mut next_gen[elites..], config.parallel);
            evaluations += size - elites;
            population = next_gen;
            generations = gen;

            let gen_best = &population[best_index(&population)];
            if gen_best.fitness() < best.fitness() {
                best = gen_best.clone();
                best_generation = gen;
            }

            window.record(best.fitness());
            recent.push(best.fitness());
            problem.on_generation(gen, best.fitness());

            if window.is_converged() {
                termination = Termination::Converged;
                break;
            }
        }

        let mut refined = problem.refine(best.clone());
        let refined_fitness = problem.evaluate(&refined);
        evaluations += 1;
        if refined_fitness < best.fitness() {
            refined.set_fitness(refined_fitness);
            best = refined;
        }

        log::debug!(
            "ga finished: generations={generations}, best={:.6}, termination={}",
            best.fitness(),
            termination.as_str()
        );

        Ok(GaResult {
            best_fitness: best.fitness(),
            best,
            generations,
            best_generation,
            evaluations,
            termination,
            recent_best: recent.to_vec(),
        })
    }
}

fn evaluate_population<P: GaProblem>(problem: &P, population: &mut [P::Individual], parallel: bool) {
    if parallel {
        population.par_iter_mut().for_each(|ind| {
            let f = problem.evaluate(ind);
            ind.set_fitness(f);
        });
    } else {
        for ind in population.iter_mut() {
            let f = problem.evaluate(ind);
            ind.set_fitness(f);
        }
    }
}

/// Index of the lowest fitness. The earliest index wins ties.
fn best_index<I: Individual>(population: &[I]) -> usize {
    let mut best = 0;
    for (i, ind) in population.iter().enumerate().skip(1) {
        if ind.fitness().total_cmp(&population[best].fitness()).is_lt() {
            best = i;
        }
    }
    best
}
