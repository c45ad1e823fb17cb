//! Route representation.

use std::sync::OnceLock;

/// An ordered visiting sequence over stop indices.
///
/// A route always holds a permutation of `0..n` for the run's `n` stops.
/// Its total cost is computed lazily by the [`Scorer`](crate::scoring::Scorer)
/// and cached; every ordering mutation drops the cache.
///
/// # Examples
///
/// ```
/// use u_routeopt::model::Route;
///
/// let mut route = Route::new(vec![0, 3, 2, 1]);
/// route.reverse_segment(1, 3);
/// assert_eq!(route.order(), &[0, 1, 2, 3]);
/// assert!(route.is_permutation_of(4));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Route {
    order: Vec<usize>,
    cost: OnceLock<f64>,
}

impl Route {
    /// Wraps an ordering.
    pub fn new(order: Vec<usize>) -> Self {
        Self {
            order,
            cost: OnceLock::new(),
        }
    }

    /// The route `0, 1, ..., n-1`.
    pub fn identity(n: usize) -> Self {
        Self::new((0..n).collect())
    }

    /// Stop indices in visiting order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Consumes the route, returning its ordering.
    pub fn into_order(self) -> Vec<usize> {
        self.order
    }

    /// Number of stops.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` for an empty route.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the cached cost, computing it with `compute` on first use.
    pub fn cost_or_init(&self, compute: impl FnOnce(&[usize]) -> f64) -> f64 {
        *self.cost.get_or_init(|| compute(&self.order))
    }

    /// Returns the cached cost if one has been computed.
    pub fn cached_cost(&self) -> Option<f64> {
        self.cost.get().copied()
    }

    /// Exchanges the stops at positions `i` and `j`.
    pub fn swap(&mut self, i: usize, j: usize) {
        self.order.swap(i, j);
        self.invalidate();
    }

    /// Reverses positions `i..=j`.
    pub fn reverse_segment(&mut self, i: usize, j: usize) {
        self.order[i..=j].reverse();
        self.invalidate();
    }

    /// Rotates the route so that `stop` comes first. No-op if absent.
    ///
    /// Cost of a closed tour is unchanged by rotation, so the cache is kept
    /// only when the caller says so.
    pub fn rotate_to(&mut self, stop: usize, keep_cost: bool) {
        if let Some(pos) = self.order.iter().position(|&s| s == stop) {
            if pos > 0 {
                self.order.rotate_left(pos);
                if !keep_cost {
                    self.invalidate();
                }
            }
        }
    }

    /// Checks the permutation invariant: every index in `0..n` exactly once.
    pub fn is_permutation_of(&self, n: usize) -> bool {
        if self.order.len() != n {
            return false;
        }
        let mut seen = vec![false; n];
        for &s in &self.order {
            if s >= n || seen[s] {
                return false;
            }
            seen[s] = true;
        }
        true
    }

    fn invalidate(&mut self) {
        self.cost = OnceLock::new();
    }
}

impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl Eq for Route {}

impl From<Vec<usize>> for Route {
    fn from(order: Vec<usize>) -> Self {
        Self::new(order)
    }
}
