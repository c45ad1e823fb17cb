//! Criterion benchmarks for the route optimization engines.
//!
//! Uses synthetic stop sets scattered around a city center, so the numbers
//! reflect engine overhead on realistic Haversine costs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use u_routeopt::distance::Haversine;
use u_routeopt::ga::GaConfig;
use u_routeopt::model::{CostMatrix, Stop};
use u_routeopt::nsga::NsgaConfig;
use u_routeopt::optimizer::{OptimizerConfig, RouteOptimizer, Strategy};
use u_routeopt::random::create_rng;
use u_routeopt::sa::SaConfig;

// ===========================================================================
// Synthetic data
// ===========================================================================

fn city(n: usize, seed: u64) -> Vec<Stop> {
    let mut rng = create_rng(seed);
    (0..n)
        .map(|i| {
            let lat = 37.55 + rng.random_range(-0.08..0.08);
            let lon = 126.98 + rng.random_range(-0.10..0.10);
            Stop::new(format!("s{i}"), lat, lon)
        })
        .collect()
}

fn run(optimizer: &RouteOptimizer, stops: &[Stop]) {
    let result = optimizer.optimize(black_box(stops), &Haversine::default());
    black_box(result).ok();
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_cost_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("cost_matrix");
    group.sample_size(10);

    for &n in &[100usize, 300] {
        let stops = city(n, 1);
        for parallel in [false, true] {
            group.bench_with_input(
                BenchmarkId::new(if parallel { "parallel" } else { "serial" }, n),
                &stops,
                |b, s| b.iter(|| black_box(CostMatrix::build(s, &Haversine::default(), parallel))),
            );
        }
    }
    group.finish();
}

fn bench_two_opt(c: &mut Criterion) {
    let mut group = c.benchmark_group("two_opt");
    group.sample_size(10);

    for &n in &[50usize, 100, 200] {
        let stops = city(n, 2);
        let config = OptimizerConfig::default().with_strategy(Strategy::TwoOpt);
        let optimizer = RouteOptimizer::new(config).expect("valid config");
        group.bench_with_input(BenchmarkId::from_parameter(n), &stops, |b, s| {
            b.iter(|| run(&optimizer, s))
        });
    }
    group.finish();
}

fn bench_genetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("genetic");
    group.sample_size(10);

    for (n, pop, gen) in [(20usize, 50usize, 50usize), (50, 60, 40), (100, 80, 30)] {
        let stops = city(n, 3);
        let ga = GaConfig::default()
            .with_population_size(pop)
            .with_max_generations(gen)
            .with_stagnation_limit(0);
        let config = OptimizerConfig::default().with_ga(ga).with_seed(42);
        let optimizer = RouteOptimizer::new(config).expect("valid config");
        group.bench_with_input(
            BenchmarkId::new(format!("p{pop}_g{gen}"), n),
            &stops,
            |b, s| b.iter(|| run(&optimizer, s)),
        );
    }
    group.finish();
}

fn bench_annealing(c: &mut Criterion) {
    let mut group = c.benchmark_group("annealing");
    group.sample_size(10);

    for &n in &[50usize, 100, 200] {
        let stops = city(n, 4);
        let sa = SaConfig::default()
            .with_cooling_rate(0.95)
            .with_max_iterations(20_000);
        let config = OptimizerConfig::default()
            .with_strategy(Strategy::SimulatedAnnealing)
            .with_sa(sa)
            .with_seed(42);
        let optimizer = RouteOptimizer::new(config).expect("valid config");
        group.bench_with_input(BenchmarkId::from_parameter(n), &stops, |b, s| {
            b.iter(|| run(&optimizer, s))
        });
    }
    group.finish();
}

fn bench_multi_objective(c: &mut Criterion) {
    let mut group = c.benchmark_group("multi_objective");
    group.sample_size(10);

    for &n in &[20usize, 50] {
        let stops = city(n, 5);
        let nsga = NsgaConfig::default()
            .with_population_size(40)
            .with_max_generations(40)
            .with_stall_generations(0);
        let config = OptimizerConfig::default()
            .with_strategy(Strategy::MultiObjective)
            .with_nsga(nsga)
            .with_seed(42);
        let optimizer = RouteOptimizer::new(config).expect("valid config");
        group.bench_with_input(BenchmarkId::from_parameter(n), &stops, |b, s| {
            b.iter(|| run(&optimizer, s))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_cost_matrix,
    bench_two_opt,
    bench_genetic,
    bench_annealing,
    bench_multi_objective
);
criterion_main!(benches);
