//! Multi-objective optimization (NSGA-II).
//!
//! Maintains a population evaluated against several minimized objectives
//! and returns the final Pareto front together with a designated best
//! compromise member.
//!
//! # Key Types
//!
//! - [`MoProblem`]: problem definition with vector-valued evaluation
//! - [`NsgaConfig`]: algorithm parameters
//! - [`NsgaRunner`]: the (μ+λ) elitist loop
//! - [`NsgaResult`]: front, compromise index and run statistics
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"

mod config;
mod runner;
mod sorting;
mod types;

pub use config::NsgaConfig;
pub use runner::{NsgaResult, NsgaRunner, TRACE_CAPACITY};
pub use sorting::{best_compromise, crowding_distance, dominates, non_dominated_sort, ParetoRanking};
pub use types::{MoProblem, MoSolution};
