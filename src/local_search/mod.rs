//! Local search refinement.
//!
//! - [`two_opt`]: segment-reversal improvement, used standalone and as the
//!   final refinement step of every population and trajectory engine.

mod two_opt;

pub use two_opt::{two_opt, TwoOptConfig, TwoOptOutcome};
