//! Data model: stops, routes and the per-run cost matrix.

mod matrix;
mod route;
mod stop;

pub use matrix::CostMatrix;
pub use route::Route;
pub use stop::{validate_stops, Stop, TimeWindow};
