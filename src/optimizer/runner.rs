//! The optimization facade.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::config::{OptimizerConfig, Strategy};
use super::types::{Diagnostics, OptimizationResult, ParetoSolution};
use crate::budget::{Budget, Termination};
use crate::distance::DistanceProvider;
use crate::error::Result;
use crate::ga::{GaConfig, GaRunner};
use crate::local_search::two_opt;
use crate::model::{validate_stops, CostMatrix, Route, Stop};
use crate::nsga::{NsgaConfig, NsgaRunner};
use crate::objectives::ObjectiveContext;
use crate::progress::ProgressObserver;
use crate::sa::{SaConfig, SaRunner};
use crate::scoring::{improvement_score, relative_improvement, Scorer};
use crate::tour::TourProblem;

/// The engine chosen at construction, with its effective configuration.
#[derive(Debug, Clone)]
enum Engine {
    Genetic(GaConfig),
    Annealing(SaConfig),
    MultiObjective(NsgaConfig),
    TwoOpt,
}

impl Engine {
    fn from_config(config: &OptimizerConfig) -> Self {
        match config.strategy {
            Strategy::Genetic => {
                let mut ga = config.ga.clone();
                ga.seed = config.seed.or(ga.seed);
                Engine::Genetic(ga)
            }
            Strategy::SimulatedAnnealing => {
                let mut sa = config.sa.clone();
                sa.seed = config.seed.or(sa.seed);
                Engine::Annealing(sa)
            }
            Strategy::MultiObjective => {
                let mut nsga = config.nsga.clone();
                nsga.seed = config.seed.or(nsga.seed);
                Engine::MultiObjective(nsga)
            }
            Strategy::TwoOpt => Engine::TwoOpt,
        }
    }
}

/// What an engine hands back to the facade.
struct EngineOutcome {
    route: Route,
    termination: Termination,
    diagnostics: Diagnostics,
    pareto_front: Vec<ParetoSolution>,
}

/// Runs one configured strategy over stop sets.
///
/// The configuration is validated once, here; a `RouteOptimizer` can then
/// be reused for any number of runs, including concurrently.
///
/// ```
/// use u_routeopt::distance::Euclidean;
/// use u_routeopt::model::Stop;
/// use u_routeopt::optimizer::{OptimizerConfig, RouteOptimizer, Strategy};
///
/// let stops = vec![
///     Stop::new("depot", 0.0, 0.0),
///     Stop::new("a", 10.0, 10.0),
///     Stop::new("b", 0.0, 10.0),
///     Stop::new("c", 10.0, 0.0),
/// ];
/// let config = OptimizerConfig::default().with_strategy(Strategy::TwoOpt);
/// let optimizer = RouteOptimizer::new(config).unwrap();
/// let result = optimizer.optimize(&stops, &Euclidean).unwrap();
///
/// assert_eq!(result.route_ids[0], "depot");
/// assert!((result.cost - 40.0).abs() < 1e-9);
/// ```
pub struct RouteOptimizer {
    config: OptimizerConfig,
    engine: Engine,
    observer: Option<Arc<dyn ProgressObserver>>,
    cancel: Option<Arc<AtomicBool>>,
}

impl std::fmt::Debug for RouteOptimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteOptimizer")
            .field("config", &self.config)
            .field("engine", &self.engine)
            .field("observer", &self.observer.is_some())
            .field("cancel", &self.cancel)
            .finish()
    }
}

impl RouteOptimizer {
    /// Validates `config` and selects the engine.
    ///
    /// # Errors
    ///
    /// [`RouteError::Configuration`](crate::error::RouteError::Configuration)
    /// if the configuration is invalid.
    pub fn new(config: OptimizerConfig) -> Result<Self> {
        config.validate()?;
        let engine = Engine::from_config(&config);
        Ok(Self {
            config,
            engine,
            observer: None,
            cancel: None,
        })
    }

    /// Attaches a progress observer.
    pub fn with_observer(mut self, observer: impl ProgressObserver + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Attaches a cancellation flag. Setting it stops any run in progress,
    /// which then returns its best route so far.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// The validated configuration.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// The selected strategy.
    pub fn strategy(&self) -> Strategy {
        self.config.strategy
    }

    /// Optimizes the visiting order of `stops`.
    ///
    /// # Errors
    ///
    /// - `Input` for malformed stops (checked before anything else runs).
    /// - `Provider` if the distance provider fails or returns an invalid cost.
    /// - `Configuration` if an objective evaluates to NaN.
    ///
    /// Running out of time is not an error: the result carries
    /// [`Termination::BudgetExceeded`] and the best route found so far.
    /// The budget also covers the provider lookups; if it runs out before
    /// every cost is known, the stops come back in input order with
    /// [`Diagnostics::Unevaluated`] and NaN costs.
    pub fn optimize<P: DistanceProvider + ?Sized>(
        &self,
        stops: &[Stop],
        provider: &P,
    ) -> Result<OptimizationResult> {
        let mut budget = Budget::new(self.config.max_duration);
        if let Some(ref flag) = self.cancel {
            budget = budget.with_cancel(Arc::clone(flag));
        }
        let strategy = self.config.strategy;

        validate_stops(stops)?;
        let n = stops.len();
        if n <= 1 {
            log::debug!("{n} stop(s): nothing to optimize");
            return Ok(trivial_result(stops, strategy, &budget));
        }

        log::debug!("optimizing {n} stops with {strategy}");
        let Some(matrix) = CostMatrix::build_within(stops, provider, true, &budget)? else {
            return Ok(unevaluated_result(stops, strategy, &budget));
        };
        let scorer = Scorer::new(&matrix, self.config.closed_tour);

        let baseline_cost = scorer.cost(&Route::identity(n));
        let initial = self.config.initial_route.build(&matrix);
        let initial_cost = scorer.cost(&initial);
        log::debug!("baseline cost {baseline_cost:.4}, initial cost {initial_cost:.4}");

        let outcome = self.run_engine(stops, scorer, &initial, &budget)?;
        let mut route = outcome.route;

        if strategy != Strategy::MultiObjective {
            // Never hand back anything costlier than the better of the
            // starting route and the input order.
            let (reference, reference_cost) = if initial_cost <= baseline_cost {
                (initial.clone(), initial_cost)
            } else {
                (Route::identity(n), baseline_cost)
            };
            let cost = scorer.cost(&route);
            if cost > reference_cost {
                log::warn!(
                    "{strategy} returned cost {cost:.4} above reference {reference_cost:.4}; keeping the reference route"
                );
                route = reference;
            }
            if self.config.closed_tour {
                route.rotate_to(0, true);
            }
        }

        let cost = scorer.cost(&route);
        let result = OptimizationResult {
            route_ids: ids_of(stops, route.order()),
            order: route.into_order(),
            cost,
            baseline_cost,
            initial_cost,
            improvement_percent: if strategy == Strategy::MultiObjective {
                relative_improvement(cost, baseline_cost)
            } else {
                improvement_score(cost, baseline_cost)
            },
            processing_time: budget.elapsed(),
            strategy,
            termination: outcome.termination,
            diagnostics: outcome.diagnostics,
            pareto_front: outcome.pareto_front,
        };

        log::info!(
            "optimized {n} stops with {strategy}: cost {:.4} ({:.2}% vs input order) in {:.3}s, {}",
            result.cost,
            result.improvement_percent,
            result.processing_seconds(),
            result.termination.as_str()
        );
        if result.budget_exceeded() {
            log::warn!("{strategy} hit its time budget; returning best route found so far");
        }
        Ok(result)
    }

    fn run_engine(
        &self,
        stops: &[Stop],
        scorer: Scorer<'_>,
        initial: &Route,
        budget: &Budget,
    ) -> Result<EngineOutcome> {
        let config = &self.config;
        let problem = TourProblem::new(scorer, initial, budget, config.strategy)
            .with_operators(config.ga.crossover, config.ga.mutation)
            .with_neighbor(config.neighbor_move)
            .with_polish(config.two_opt.clone(), config.polish)
            .with_observer(self.observer.as_deref());

        match &self.engine {
            Engine::Genetic(ga) => {
                let result = GaRunner::run_with_budget(&problem, ga, budget)?;
                Ok(EngineOutcome {
                    route: result.best.route,
                    termination: result.termination,
                    diagnostics: Diagnostics::Genetic {
                        generations: result.generations,
                        best_generation: result.best_generation,
                        evaluations: result.evaluations,
                        recent_best: result.recent_best,
                    },
                    pareto_front: Vec::new(),
                })
            }
            Engine::Annealing(sa) => {
                let result = SaRunner::run_with_budget(&problem, sa, budget)?;
                Ok(EngineOutcome {
                    route: problem.polish(result.best),
                    termination: result.termination,
                    diagnostics: Diagnostics::Annealing {
                        iterations: result.iterations,
                        temperature_steps: result.temperature_steps,
                        final_temperature: result.final_temperature,
                        accepted_moves: result.accepted_moves,
                        improving_moves: result.improving_moves,
                        reheats: result.reheats,
                        best_iteration: result.best_iteration,
                        temperature_trace: result.trace,
                    },
                    pareto_front: Vec::new(),
                })
            }
            Engine::MultiObjective(nsga) => {
                let context = ObjectiveContext::new(scorer, stops, config.travel_time_factor);
                let problem = problem.with_objectives(context, &config.objectives);
                let result = NsgaRunner::run_with_budget(&problem, nsga, budget)?;
                let route = result
                    .compromise_solution()
                    .map(|member| member.solution.clone())
                    .unwrap_or_else(|| initial.clone());
                let pareto_front = result
                    .front
                    .iter()
                    .map(|member| ParetoSolution {
                        route_ids: ids_of(stops, member.solution.order()),
                        order: member.solution.order().to_vec(),
                        objectives: member.objectives.clone(),
                    })
                    .collect();
                Ok(EngineOutcome {
                    route,
                    termination: result.termination,
                    diagnostics: Diagnostics::MultiObjective {
                        generations: result.generations,
                        evaluations: result.evaluations,
                        front_size: result.front.len(),
                        front_sizes: result.front_sizes,
                    },
                    pareto_front,
                })
            }
            Engine::TwoOpt => {
                let outcome = two_opt(initial, &scorer, &config.two_opt, budget);
                problem.report(outcome.passes, scorer.cost(&outcome.route));
                Ok(EngineOutcome {
                    route: outcome.route,
                    termination: outcome.termination,
                    diagnostics: Diagnostics::TwoOpt {
                        passes: outcome.passes,
                        improvements: outcome.improvements,
                    },
                    pareto_front: Vec::new(),
                })
            }
        }
    }
}

/// Validates `config` and runs it once.
///
/// # Errors
///
/// See [`RouteOptimizer::new`] and [`RouteOptimizer::optimize`].
pub fn optimize<P: DistanceProvider + ?Sized>(
    stops: &[Stop],
    provider: &P,
    config: &OptimizerConfig,
) -> Result<OptimizationResult> {
    RouteOptimizer::new(config.clone())?.optimize(stops, provider)
}

fn ids_of(stops: &[Stop], order: &[usize]) -> Vec<String> {
    order.iter().map(|&i| stops[i].id().to_string()).collect()
}

fn trivial_result(stops: &[Stop], strategy: Strategy, budget: &Budget) -> OptimizationResult {
    let order: Vec<usize> = (0..stops.len()).collect();
    OptimizationResult {
        route_ids: ids_of(stops, &order),
        order,
        cost: 0.0,
        baseline_cost: 0.0,
        initial_cost: 0.0,
        improvement_percent: 0.0,
        processing_time: budget.elapsed(),
        strategy,
        termination: Termination::Completed,
        diagnostics: Diagnostics::Trivial,
        pareto_front: Vec::new(),
    }
}

fn unevaluated_result(stops: &[Stop], strategy: Strategy, budget: &Budget) -> OptimizationResult {
    let termination = budget.exhausted().unwrap_or(Termination::BudgetExceeded);
    log::warn!(
        "{strategy} stopped ({}) while gathering travel costs for {} stops; returning input order",
        termination.as_str(),
        stops.len()
    );
    let order: Vec<usize> = (0..stops.len()).collect();
    OptimizationResult {
        route_ids: ids_of(stops, &order),
        order,
        cost: f64::NAN,
        baseline_cost: f64::NAN,
        initial_cost: f64::NAN,
        improvement_percent: 0.0,
        processing_time: budget.elapsed(),
        strategy,
        termination,
        diagnostics: Diagnostics::Unevaluated,
        pareto_front: Vec::new(),
    }
}
