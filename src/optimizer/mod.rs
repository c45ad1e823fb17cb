//! Optimization facade.
//!
//! [`RouteOptimizer`] validates an [`OptimizerConfig`] once, selects one of
//! a closed set of engines, and turns each run into an
//! [`OptimizationResult`]:
//!
//! 1. validate the stops
//! 2. build the cost matrix from the distance provider
//! 3. build the starting route
//! 4. run the engine under the wall-clock budget
//! 5. guard against regressions and report

mod config;
mod runner;
mod types;

pub use config::{OptimizerConfig, Strategy};
pub use runner::{optimize, RouteOptimizer};
pub use types::{Diagnostics, OptimizationResult, ParetoSolution};
