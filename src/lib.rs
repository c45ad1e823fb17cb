//! Route optimization engine.
//!
//! Computes near-optimal visiting orders over a set of geographic stops
//! with classical metaheuristics:
//!
//! - **Genetic Algorithm (GA)**: population-based search with order or
//!   partially-mapped crossover, tournament selection and elitism.
//! - **Simulated Annealing (SA)**: single-trajectory search with pluggable
//!   cooling schedules, neighbor moves and reheating.
//! - **NSGA-II**: multi-objective search returning a Pareto front and a
//!   best compromise route.
//! - **2-opt**: local improvement, used standalone and to polish the GA and
//!   SA results.
//!
//! # Architecture
//!
//! The engines in [`ga`], [`sa`] and [`nsga`] are generic over problem
//! traits and know nothing about routes. The route semantics (cost over a
//! precomputed [`CostMatrix`](model::CostMatrix), operators, seeding) are
//! supplied by one internal adapter, and the [`optimizer`] facade wires a
//! [`DistanceProvider`](distance::DistanceProvider), a
//! [`Budget`](budget::Budget) and an optional progress observer around
//! them.
//!
//! # Example
//!
//! ```
//! use u_routeopt::distance::Haversine;
//! use u_routeopt::model::Stop;
//! use u_routeopt::optimizer::{optimize, OptimizerConfig, Strategy};
//!
//! let stops = vec![
//!     Stop::new("hub", 37.5665, 126.9780),
//!     Stop::new("a", 37.5796, 126.9770),
//!     Stop::new("b", 37.5512, 126.9882),
//!     Stop::new("c", 37.5700, 127.0090),
//!     Stop::new("d", 37.5443, 127.0557),
//! ];
//! let config = OptimizerConfig::default()
//!     .with_strategy(Strategy::Genetic)
//!     .with_seed(7);
//!
//! let result = optimize(&stops, &Haversine::default(), &config).unwrap();
//! assert_eq!(result.route_ids.len(), 5);
//! assert!(result.cost <= result.baseline_cost);
//! ```

pub mod budget;
pub mod construction;
pub mod distance;
pub mod error;
pub mod ga;
pub mod history;
pub mod local_search;
pub mod model;
pub mod nsga;
pub mod objectives;
pub mod optimizer;
pub mod progress;
pub mod random;
pub mod sa;
pub mod scoring;
mod tour;

pub use budget::{Budget, Termination};
pub use distance::{CachedProvider, DistanceProvider, Euclidean, Haversine};
pub use error::{Result, RouteError};
pub use model::{Route, Stop, TimeWindow};
pub use objectives::Objective;
pub use optimizer::{optimize, OptimizationResult, OptimizerConfig, RouteOptimizer, Strategy};
pub use progress::{ProgressEvent, ProgressObserver};
