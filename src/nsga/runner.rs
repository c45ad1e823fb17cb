//! NSGA-II execution loop.
//!
//! Each generation breeds `population_size` offspring by crowded binary
//! tournament, merges them with the parents, ranks the union and keeps the
//! best `population_size` members by (front, crowding distance).

use rand::Rng;
use rayon::prelude::*;

use super::config::NsgaConfig;
use super::sorting::{best_compromise, crowding_distance, non_dominated_sort};
use super::types::{MoProblem, MoSolution};
use crate::budget::{Budget, Termination};
use crate::error::{Result, RouteError};
use crate::history::BoundedHistory;
use crate::random::rng_from;

/// Number of per-generation front sizes kept in [`NsgaResult::front_sizes`].
pub const TRACE_CAPACITY: usize = 64;

/// Result of an NSGA-II run.
#[derive(Debug, Clone)]
pub struct NsgaResult<S> {
    /// Final front 0, one member per distinct objective vector.
    pub front: Vec<MoSolution<S>>,

    /// Index into `front` of the best compromise solution.
    pub compromise: usize,

    /// Completed generations.
    pub generations: usize,

    /// Number of evaluations performed.
    pub evaluations: usize,

    /// Why the loop stopped.
    pub termination: Termination,

    /// Front-0 size after each of the last few generations, oldest first.
    pub front_sizes: Vec<usize>,
}

impl<S> NsgaResult<S> {
    /// The best compromise member.
    pub fn compromise_solution(&self) -> Option<&MoSolution<S>> {
        self.front.get(self.compromise)
    }
}

/// Executes the NSGA-II loop.
pub struct NsgaRunner;

impl NsgaRunner {
    /// Runs NSGA-II without a time limit.
    ///
    /// # Errors
    ///
    /// See [`run_with_budget`](Self::run_with_budget).
    pub fn run<P: MoProblem>(problem: &P, config: &NsgaConfig) -> Result<NsgaResult<P::Solution>> {
        Self::run_with_budget(problem, config, &Budget::unlimited())
    }

    /// Runs NSGA-II until the generation allowance, front stabilization or
    /// the budget stops it.
    ///
    /// # Errors
    ///
    /// - [`RouteError::Configuration`] for an invalid config, zero
    ///   objectives, a weight count that does not match the objectives, or
    ///   an objective value that is NaN or infinite.
    /// - Any error returned by [`MoProblem::evaluate`].
    pub fn run_with_budget<P: MoProblem>(
        problem: &P,
        config: &NsgaConfig,
        budget: &Budget,
    ) -> Result<NsgaResult<P::Solution>> {
        config.validate()?;
        let m = problem.objective_count();
        if m == 0 {
            return Err(RouteError::config("objectives must not be empty"));
        }
        if !config.compromise_weights.is_empty() && config.compromise_weights.len() != m {
            return Err(RouteError::config(format!(
                "{} compromise weights given for {m} objectives",
                config.compromise_weights.len()
            )));
        }

        let mut rng = rng_from(config.seed);
        let size = config.population_size;

        let initial: Vec<P::Solution> = (0..size)
            .map(|index| problem.create_solution(index, &mut rng))
            .collect();
        let mut population = evaluate_all(problem, initial, m, config.parallel)?;
        let mut evaluations = population.len();
        assign_ranks(&mut population)?;

        let mut stability = BoundedHistory::new(config.stall_generations + 1);
        let mut trace = BoundedHistory::new(TRACE_CAPACITY);
        let size0 = front_size(&population);
        stability.push(size0);
        trace.push(size0);

        let mut generations = 0;
        let mut termination = Termination::Completed;

        'evolve: for gen in 1..=config.max_generations {
            if let Some(reason) = budget.exhausted() {
                termination = reason;
                break;
            }

            let mut offspring: Vec<P::Solution> = Vec::with_capacity(size);
            while offspring.len() < size {
                if let Some(reason) = budget.exhausted() {
                    termination = reason;
                    break 'evolve;
                }

                let a = crowded_tournament(&population, config.tournament_size, &mut rng);
                let b = crowded_tournament(&population, config.tournament_size, &mut rng);
                let children = if rng.random::<f64>() < config.crossover_rate {
                    problem.crossover(&population[a].solution, &population[b].solution, &mut rng)
                } else {
                    vec![population[a].solution.clone()]
                };

                for mut child in children {
                    if offspring.len() >= size {
                        break;
                    }
                    if rng.random::<f64>() < config.mutation_rate {
                        problem.mutate(&mut child, &mut rng);
                    }
                    offspring.push(child);
                }
            }

            let offspring = evaluate_all(problem, offspring, m, config.parallel)?;
            evaluations += offspring.len();

            // (μ+λ) survivor selection. The sort is stable, so parents win
            // exact ties against offspring.
            population.extend(offspring);
            assign_ranks(&mut population)?;
            population.sort_by(|a, b| {
                a.rank
                    .cmp(&b.rank)
                    .then_with(|| b.crowding.total_cmp(&a.crowding))
            });
            population.truncate(size);
            assign_ranks(&mut population)?;
            generations = gen;

            let first_front: Vec<&MoSolution<P::Solution>> =
                population.iter().filter(|s| s.rank == 0).collect();
            problem.on_generation(gen, &first_front);
            let current = first_front.len();
            stability.push(current);
            trace.push(current);

            if config.stall_generations > 0
                && stability.is_full()
                && stability.iter().all(|&s| s == current)
            {
                termination = Termination::Converged;
                break;
            }
        }

        let mut front: Vec<MoSolution<P::Solution>> = Vec::new();
        for member in population.into_iter().filter(|member| member.rank == 0) {
            if !front.iter().any(|kept| kept.objectives == member.objectives) {
                front.push(member);
            }
        }

        let compromise = {
            let objectives: Vec<&[f64]> = front.iter().map(|s| s.objectives.as_slice()).collect();
            let members: Vec<usize> = (0..front.len()).collect();
            best_compromise(&objectives, &members, &config.compromise_weights).unwrap_or(0)
        };

        log::debug!(
            "nsga finished: generations={generations}, front={}, termination={}",
            front.len(),
            termination.as_str()
        );

        Ok(NsgaResult {
            front,
            compromise,
            generations,
            evaluations,
            termination,
            front_sizes: trace.to_vec(),
        })
    }
}

fn evaluate_all<P: MoProblem>(
    problem: &P,
    solutions: Vec<P::Solution>,
    m: usize,
    parallel: bool,
) -> Result<Vec<MoSolution<P::Solution>>> {
    let objectives: Vec<Vec<f64>> = if parallel {
        solutions.par_iter().map(|s| problem.evaluate(s)).collect::<Result<_>>()?
    } else {
        solutions.iter().map(|s| problem.evaluate(s)).collect::<Result<_>>()?
    };
    if let Some(bad) = objectives.iter().find(|v| v.len() != m) {
        return Err(RouteError::config(format!(
            "evaluation returned {} objectives, expected {m}",
            bad.len()
        )));
    }
    Ok(solutions
        .into_iter()
        .zip(objectives)
        .map(|(solution, objectives)| MoSolution::new(solution, objectives))
        .collect())
}

/// Recomputes rank and crowding distance for every member.
fn assign_ranks<S>(population: &mut [MoSolution<S>]) -> Result<()> {
    let (fronts, distances) = {
        let objectives: Vec<&[f64]> = population.iter().map(|s| s.objectives.as_slice()).collect();
        let ranking = non_dominated_sort(&objectives)?;
        let distances: Vec<Vec<f64>> = ranking
            .fronts
            .iter()
            .map(|front| crowding_distance(&objectives, front))
            .collect();
        (ranking.fronts, distances)
    };
    for (rank, (front, dist)) in fronts.iter().zip(distances).enumerate() {
        for (&i, d) in front.iter().zip(dist) {
            population[i].rank = rank;
            population[i].crowding = d;
        }
    }
    Ok(())
}

fn crowded_tournament<S, R: Rng>(population: &[MoSolution<S>], k: usize, rng: &mut R) -> usize {
    let n = population.len();
    let mut winner = rng.random_range(0..n);
    for _ in 1..k {
        let challenger = rng.random_range(0..n);
        if population[challenger].crowded_better(&population[winner]) {
            winner = challenger;
        }
    }
    winner
}

fn front_size<S>(population: &[MoSolution<S>]) -> usize {
    population.iter().filter(|s| s.rank == 0).count()
}
