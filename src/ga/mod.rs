//! Genetic algorithm engine.
//!
//! A generic GA loop built on trait-based abstractions. The route problem
//! plugs in by implementing [`GaProblem`], which specifies how to create,
//! evaluate, recombine, mutate and finally refine individuals.
//!
//! # Core Traits
//!
//! - [`Individual`]: a candidate solution that carries its fitness
//! - [`GaProblem`]: problem definition (initialization, evaluation, operators)
//!
//! # Key Types
//!
//! - [`GaConfig`]: algorithm parameters and presets
//! - [`GaRunner`]: executes the evolutionary loop under a [`Budget`](crate::budget::Budget)
//! - [`GaResult`]: best individual plus run statistics
//!
//! # Submodules
//!
//! - [`operators`]: permutation crossover (OX, PMX) and mutation operators
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains" (order crossover)

mod config;
pub mod operators;
mod runner;
mod selection;
mod types;

pub use config::GaConfig;
pub(crate) use config::check_rate;
pub use operators::{Crossover, Mutation};
pub use runner::{GaResult, GaRunner, TRACE_CAPACITY};
pub use selection::Selection;
pub use types::{Candidate, GaProblem, Individual};
