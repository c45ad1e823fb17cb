//! Integration tests for u-routeopt.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::Rng;
use u_routeopt::budget::Termination;
use u_routeopt::construction::InitialRoute;
use u_routeopt::distance::{DistanceProvider, Euclidean};
use u_routeopt::ga::GaConfig;
use u_routeopt::model::{Stop, TimeWindow};
use u_routeopt::nsga::{dominates, NsgaConfig};
use u_routeopt::optimizer::{Diagnostics, OptimizationResult, OptimizerConfig, RouteOptimizer};
use u_routeopt::random::create_rng;
use u_routeopt::sa::SaConfig;
use u_routeopt::{optimize, ProgressEvent, RouteError, Strategy};

/// Stop at planar point `(x, y)`; `Euclidean` reads longitude as `x`.
fn point(id: &str, x: f64, y: f64) -> Stop {
    Stop::new(id, y, x)
}

fn scattered(n: usize, seed: u64) -> Vec<Stop> {
    let mut rng = create_rng(seed);
    (0..n)
        .map(|i| {
            point(
                &format!("s{i}"),
                rng.random_range(0.0..100.0),
                rng.random_range(0.0..80.0),
            )
        })
        .collect()
}

fn tour_cost(stops: &[Stop], order: &[usize]) -> f64 {
    let n = order.len();
    (0..n)
        .map(|i| {
            let (a, b) = (&stops[order[i]], &stops[order[(i + 1) % n]]);
            Euclidean.cost(a, b).unwrap()
        })
        .sum()
}

fn assert_permutation(result: &OptimizationResult, n: usize) {
    let mut sorted = result.order.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..n).collect::<Vec<_>>());
    assert_eq!(result.route_ids.len(), n);
}

fn quick_config(strategy: Strategy) -> OptimizerConfig {
    OptimizerConfig::default()
        .with_strategy(strategy)
        .with_ga(
            GaConfig::default()
                .with_population_size(20)
                .with_max_generations(30),
        )
        .with_sa(SaConfig::default().with_max_iterations(5_000))
        .with_nsga(
            NsgaConfig::default()
                .with_population_size(20)
                .with_max_generations(30),
        )
        .with_seed(11)
}

mod golden_tests {
    use super::*;

    /// Square corners plus the center; the input order crosses itself.
    fn square_with_center() -> Vec<Stop> {
        vec![
            point("a", 0.0, 0.0),
            point("b", 10.0, 10.0),
            point("c", 10.0, 0.0),
            point("d", 0.0, 10.0),
            point("e", 5.0, 5.0),
        ]
    }

    #[test]
    fn test_two_opt_uncrosses_square() {
        let stops = square_with_center();
        let config = OptimizerConfig::default()
            .with_strategy(Strategy::TwoOpt)
            .with_initial_route(InitialRoute::InputOrder);
        let result = optimize(&stops, &Euclidean, &config).unwrap();

        let naive = 10.0 + 20.0 * 2f64.sqrt() + 2.0 * 50f64.sqrt();
        assert!((result.baseline_cost - naive).abs() < 1e-9);

        let optimum = 30.0 + 2.0 * 50f64.sqrt();
        assert!((result.cost - optimum).abs() < 1e-9, "cost {}", result.cost);
        assert_eq!(result.order, vec![0, 2, 1, 3, 4]);
        assert_eq!(result.route_ids, vec!["a", "c", "b", "d", "e"]);
        assert!(result.improvement_percent > 15.0);
        assert_eq!(result.termination, Termination::Converged);
    }

    #[test]
    fn test_ga_close_to_brute_force() {
        // Three tight clusters of 3-4 stops.
        let centers = [(10.0, 10.0), (60.0, 15.0), (35.0, 55.0)];
        let mut rng = create_rng(5);
        let stops: Vec<Stop> = (0..10)
            .map(|i| {
                let (cx, cy) = centers[i % 3];
                point(
                    &format!("c{i}"),
                    cx + rng.random_range(-3.0..3.0),
                    cy + rng.random_range(-3.0..3.0),
                )
            })
            .collect();

        let optimum = brute_force(&stops);

        let ga = GaConfig::default()
            .with_population_size(20)
            .with_max_generations(50);
        let config = OptimizerConfig::default().with_ga(ga).with_seed(3);
        let result = optimize(&stops, &Euclidean, &config).unwrap();

        assert_permutation(&result, 10);
        assert!(
            result.cost <= optimum * 1.05 + 1e-9,
            "GA cost {} vs optimum {}",
            result.cost,
            optimum
        );
    }

    /// Exhaustive search over tours starting at stop 0.
    fn brute_force(stops: &[Stop]) -> f64 {
        fn search(
            stops: &[Stop],
            order: &mut Vec<usize>,
            used: &mut [bool],
            best: &mut f64,
        ) {
            if order.len() == stops.len() {
                *best = best.min(tour_cost(stops, order));
                return;
            }
            for i in 1..stops.len() {
                if !used[i] {
                    used[i] = true;
                    order.push(i);
                    search(stops, order, used, best);
                    order.pop();
                    used[i] = false;
                }
            }
        }

        let mut used = vec![false; stops.len()];
        used[0] = true;
        let mut best = f64::INFINITY;
        search(stops, &mut vec![0], &mut used, &mut best);
        best
    }
}

mod engine_tests {
    use super::*;

    #[test]
    fn test_results_never_regress() {
        let stops = scattered(40, 9);
        for strategy in [
            Strategy::Genetic,
            Strategy::SimulatedAnnealing,
            Strategy::TwoOpt,
        ] {
            let result = optimize(&stops, &Euclidean, &quick_config(strategy)).unwrap();
            assert_permutation(&result, 40);
            assert!(result.cost <= result.initial_cost + 1e-9, "{strategy}");
            assert!(result.cost <= result.baseline_cost + 1e-9, "{strategy}");
            assert!((tour_cost(&stops, &result.order) - result.cost).abs() < 1e-6);
            // Closed tours start at the first input stop.
            assert_eq!(result.order[0], 0);
        }
    }

    #[test]
    fn test_same_seed_same_route() {
        let stops = scattered(30, 4);
        for strategy in [
            Strategy::Genetic,
            Strategy::SimulatedAnnealing,
            Strategy::MultiObjective,
        ] {
            let config = quick_config(strategy);
            let a = optimize(&stops, &Euclidean, &config).unwrap();
            let b = optimize(&stops, &Euclidean, &config).unwrap();
            assert_eq!(a.order, b.order, "{strategy}");
            assert_eq!(a.cost, b.cost, "{strategy}");
            assert_eq!(a.pareto_front, b.pareto_front, "{strategy}");
        }
    }

    #[test]
    fn test_two_opt_is_idempotent() {
        let stops = scattered(35, 8);
        let config = OptimizerConfig::default()
            .with_strategy(Strategy::TwoOpt)
            .with_initial_route(InitialRoute::InputOrder);
        let first = optimize(&stops, &Euclidean, &config).unwrap();

        let reordered: Vec<Stop> = first.order.iter().map(|&i| stops[i].clone()).collect();
        let second = optimize(&reordered, &Euclidean, &config).unwrap();

        assert_eq!(second.route_ids, first.route_ids);
        assert!((second.cost - first.cost).abs() < 1e-9);
        match second.diagnostics {
            Diagnostics::TwoOpt { improvements, .. } => assert_eq!(improvements, 0),
            ref other => panic!("unexpected diagnostics {other:?}"),
        }
    }

    #[test]
    fn test_pareto_front_is_non_dominated() {
        let mut stops = scattered(12, 21);
        // Tight windows that pull against the shortest tour.
        for (i, stop) in stops.iter_mut().enumerate().skip(1) {
            let due = if i % 2 == 0 { 40.0 } else { 400.0 };
            *stop = stop.clone().with_time_window(TimeWindow::new(0.0, due));
        }

        let result = optimize(&stops, &Euclidean, &quick_config(Strategy::MultiObjective)).unwrap();
        assert!(!result.pareto_front.is_empty());
        assert_permutation(&result, 12);

        for a in &result.pareto_front {
            assert_eq!(a.objectives.len(), 3);
            for b in &result.pareto_front {
                assert!(!dominates(&a.objectives, &b.objectives));
            }
        }
        // The compromise is a front member.
        assert!(result.pareto_front.iter().any(|s| s.order == result.order));
    }

    #[test]
    fn test_budget_cuts_large_run_short() {
        let stops = scattered(500, 2);
        let config = OptimizerConfig::default()
            .with_max_duration(Duration::from_millis(10))
            .with_seed(1);
        let result = optimize(&stops, &Euclidean, &config).unwrap();

        assert_permutation(&result, 500);
        assert!(result.budget_exceeded());
        assert_eq!(result.termination, Termination::BudgetExceeded);
        assert!(
            result.processing_time < Duration::from_secs(2),
            "took {:?}",
            result.processing_time
        );
        if result.diagnostics == Diagnostics::Unevaluated {
            assert!(result.cost.is_nan());
        } else {
            assert!(result.cost <= result.initial_cost + 1e-9);
        }
    }

    /// Every lookup sleeps, as a remote routing service would.
    struct SlowProvider(Duration);

    impl DistanceProvider for SlowProvider {
        fn cost(&self, from: &Stop, to: &Stop) -> u_routeopt::Result<f64> {
            std::thread::sleep(self.0);
            Euclidean.cost(from, to)
        }
    }

    #[test]
    fn test_budget_covers_slow_cost_lookups() {
        let stops = scattered(120, 4);
        let config = OptimizerConfig::default()
            .with_strategy(Strategy::TwoOpt)
            .with_max_duration(Duration::from_millis(10));
        let provider = SlowProvider(Duration::from_micros(200));
        let result = optimize(&stops, &provider, &config).unwrap();

        assert!(
            result.processing_time < Duration::from_secs(1),
            "took {:?}",
            result.processing_time
        );
        assert_eq!(result.termination, Termination::BudgetExceeded);
        assert_eq!(result.diagnostics, Diagnostics::Unevaluated);
        assert_eq!(result.order, (0..120).collect::<Vec<_>>());
        assert_eq!(result.route_ids[0], "s0");
        assert!(result.cost.is_nan());
        assert_eq!(result.improvement_percent, 0.0);
    }

    #[test]
    fn test_trivial_inputs() {
        for n in [0, 1] {
            let stops = scattered(n, 1);
            let result = optimize(&stops, &Euclidean, &OptimizerConfig::default()).unwrap();
            assert_eq!(result.order, (0..n).collect::<Vec<_>>());
            assert_eq!(result.cost, 0.0);
            assert_eq!(result.diagnostics, Diagnostics::Trivial);
        }
    }
}

mod host_tests {
    use super::*;

    #[test]
    fn test_observer_sees_progress() {
        let events: Arc<Mutex<Vec<ProgressEvent>>> = Arc::default();
        let sink = Arc::clone(&events);
        let ga = GaConfig::default()
            .with_population_size(10)
            .with_max_generations(12)
            .with_stagnation_limit(0);
        let optimizer = RouteOptimizer::new(OptimizerConfig::default().with_ga(ga).with_seed(2))
            .unwrap()
            .with_observer(move |e: &ProgressEvent| sink.lock().unwrap().push(e.clone()));

        optimizer.optimize(&scattered(15, 3), &Euclidean).unwrap();

        let events = events.lock().unwrap();
        assert!(!events.is_empty());
        assert!(events.iter().all(|e| e.strategy == Strategy::Genetic));
        for pair in events.windows(2) {
            assert!(pair[1].iteration > pair[0].iteration);
            assert!(pair[1].best_cost <= pair[0].best_cost + 1e-9);
        }
    }

    #[test]
    fn test_cancel_flag_returns_best_so_far() {
        let flag = Arc::new(AtomicBool::new(true));
        for strategy in [
            Strategy::Genetic,
            Strategy::SimulatedAnnealing,
            Strategy::MultiObjective,
            Strategy::TwoOpt,
        ] {
            let optimizer = RouteOptimizer::new(quick_config(strategy))
                .unwrap()
                .with_cancel_flag(Arc::clone(&flag));
            let result = optimizer.optimize(&scattered(25, 6), &Euclidean).unwrap();
            assert_eq!(result.termination, Termination::Cancelled, "{strategy}");
            assert!(!result.budget_exceeded());
            assert_permutation(&result, 25);
        }
    }
}

mod error_tests {
    use super::*;

    struct Failing;

    impl DistanceProvider for Failing {
        fn cost(&self, from: &Stop, to: &Stop) -> u_routeopt::Result<f64> {
            if to.id() == "s3" {
                Err(RouteError::provider(from.id(), to.id(), "no road"))
            } else {
                Euclidean.cost(from, to)
            }
        }
    }

    #[test]
    fn test_invalid_stops_are_input_errors() {
        let mut stops = scattered(4, 1);
        stops[2] = Stop::new("s0", 10.0, 10.0);
        let err = optimize(&stops, &Euclidean, &OptimizerConfig::default()).unwrap_err();
        assert!(matches!(err, RouteError::Input(_)));
        assert!(err.is_caller_error());

        let stops = vec![Stop::new("a", f64::NAN, 0.0), Stop::new("b", 1.0, 1.0)];
        let err = optimize(&stops, &Euclidean, &OptimizerConfig::default()).unwrap_err();
        assert!(matches!(err, RouteError::Input(_)));

        let stops = vec![Stop::new("a", 95.0, 0.0), Stop::new("b", 1.0, 1.0)];
        let err = optimize(&stops, &Euclidean, &OptimizerConfig::default()).unwrap_err();
        assert!(matches!(err, RouteError::Input(_)));
    }

    #[test]
    fn test_bad_parameters_are_configuration_errors() {
        let config = OptimizerConfig::default()
            .with_ga(GaConfig::default().with_population_size(1));
        let err = RouteOptimizer::new(config).unwrap_err();
        assert!(matches!(err, RouteError::Configuration(_)));
        assert!(err.is_caller_error());

        let err = OptimizerConfig::default()
            .with_objective_ids(&["distance", "speed"])
            .unwrap_err();
        assert!(matches!(err, RouteError::Configuration(_)));

        let err = OptimizerConfig::default()
            .with_max_duration_secs(-1.0)
            .unwrap_err();
        assert!(matches!(err, RouteError::Configuration(_)));
    }

    #[test]
    fn test_provider_failures_are_not_caller_errors() {
        let err = optimize(&scattered(6, 1), &Failing, &OptimizerConfig::default()).unwrap_err();
        match &err {
            RouteError::Provider { to, reason, .. } => {
                assert_eq!(to, "s3");
                assert_eq!(reason, "no road");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(!err.is_caller_error());

        let negative = |_: &Stop, _: &Stop| -1.0;
        let err = optimize(&scattered(3, 1), &negative, &OptimizerConfig::default()).unwrap_err();
        assert!(matches!(err, RouteError::Provider { .. }));
    }
}
