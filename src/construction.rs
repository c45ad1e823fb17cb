//! Initial route construction.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::model::{CostMatrix, Route};

/// How the starting route handed to an engine is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InitialRoute {
    /// Stops in the order the caller supplied them.
    InputOrder,
    /// Greedy nearest-neighbor walk from the first input stop.
    #[default]
    NearestNeighbor,
}

impl InitialRoute {
    /// Builds the route for `matrix`.
    pub fn build(self, matrix: &CostMatrix) -> Route {
        match self {
            InitialRoute::InputOrder => Route::identity(matrix.len()),
            InitialRoute::NearestNeighbor => nearest_neighbor(matrix, 0),
        }
    }
}

/// Greedy nearest-neighbor route starting at `start`.
///
/// Ties go to the lowest stop index, so the result is deterministic.
/// Returns an empty route for an empty matrix.
///
/// # Complexity
/// O(n²)
pub fn nearest_neighbor(matrix: &CostMatrix, start: usize) -> Route {
    let n = matrix.len();
    if n == 0 {
        return Route::default();
    }
    let start = start.min(n - 1);
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut current = start;
    visited[current] = true;
    order.push(current);

    while order.len() < n {
        let mut next = usize::MAX;
        let mut best = f64::INFINITY;
        for (j, &seen) in visited.iter().enumerate() {
            if !seen && (next == usize::MAX || matrix.get(current, j) < best) {
                best = matrix.get(current, j);
                next = j;
            }
        }
        visited[next] = true;
        order.push(next);
        current = next;
    }

    Route::new(order)
}
