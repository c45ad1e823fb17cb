//! Property tests: every strategy returns a permutation of its input and
//! never hands back a route costlier than where it started.

use proptest::prelude::*;
use rand::Rng;
use u_routeopt::distance::Euclidean;
use u_routeopt::ga::GaConfig;
use u_routeopt::model::Stop;
use u_routeopt::nsga::NsgaConfig;
use u_routeopt::optimizer::{OptimizerConfig, Strategy as Engine};
use u_routeopt::random::create_rng;
use u_routeopt::sa::SaConfig;
use u_routeopt::{optimize, Haversine};

fn stops(n: usize, seed: u64) -> Vec<Stop> {
    let mut rng = create_rng(seed);
    (0..n)
        .map(|i| {
            Stop::new(
                format!("p{i}"),
                rng.random_range(-60.0..60.0),
                rng.random_range(-150.0..150.0),
            )
        })
        .collect()
}

fn small_config(strategy: Engine, seed: u64) -> OptimizerConfig {
    OptimizerConfig::default()
        .with_strategy(strategy)
        .with_ga(
            GaConfig::default()
                .with_population_size(8)
                .with_max_generations(4),
        )
        .with_sa(SaConfig::default().with_max_iterations(1_500))
        .with_nsga(
            NsgaConfig::default()
                .with_population_size(8)
                .with_max_generations(4),
        )
        .with_seed(seed)
}

fn any_strategy() -> impl Strategy<Value = Engine> {
    prop_oneof![
        Just(Engine::Genetic),
        Just(Engine::SimulatedAnnealing),
        Just(Engine::MultiObjective),
        Just(Engine::TwoOpt),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_result_is_permutation(
        n in prop_oneof![Just(0usize), Just(1), Just(2), Just(50), Just(200)],
        strategy in any_strategy(),
        closed in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let input = stops(n, seed);
        let config = small_config(strategy, seed).with_closed_tour(closed);
        let result = optimize(&input, &Haversine::default(), &config).unwrap();

        let mut sorted = result.order.clone();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, (0..n).collect::<Vec<_>>());
        let ids: Vec<&str> = result.order.iter().map(|&i| input[i].id()).collect();
        prop_assert_eq!(result.route_ids.iter().map(String::as_str).collect::<Vec<_>>(), ids);
        prop_assert!(result.cost.is_finite() && result.cost >= 0.0);
    }

    #[test]
    fn prop_single_objective_never_regresses(
        n in 2usize..40,
        strategy in prop_oneof![
            Just(Engine::Genetic),
            Just(Engine::SimulatedAnnealing),
            Just(Engine::TwoOpt),
        ],
        closed in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let input = stops(n, seed);
        let config = small_config(strategy, seed).with_closed_tour(closed);
        let result = optimize(&input, &Euclidean, &config).unwrap();

        prop_assert!(result.cost <= result.initial_cost + 1e-9);
        prop_assert!(result.cost <= result.baseline_cost + 1e-9);
        prop_assert!(result.improvement_percent >= -1e-9);
        if closed {
            prop_assert_eq!(result.order[0], 0);
        }
    }
}
