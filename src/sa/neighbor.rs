//! Neighbor generators for permutation-encoded routes.
//!
//! The SA loop never looks inside a move. Anything implementing
//! [`NeighborGenerator`] can be plugged into the route problem.

use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Produces a nearby visiting order.
pub trait NeighborGenerator: Send + Sync {
    /// Returns a new order derived from `order`. `order` is left untouched.
    ///
    /// For two or more stops the result must differ from the input
    /// whenever the move allows it.
    fn propose<R: Rng>(&self, order: &[usize], rng: &mut R) -> Vec<usize>;
}

/// The built-in neighborhood moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NeighborMove {
    /// Exchange two distinct positions.
    Swap,
    /// Reverse a segment of at least two stops (a random 2-opt move).
    #[default]
    Reverse,
    /// Move one stop to another position.
    Insert,
    /// Pick one of the above uniformly per call.
    Mixed,
}

impl NeighborGenerator for NeighborMove {
    fn propose<R: Rng>(&self, order: &[usize], rng: &mut R) -> Vec<usize> {
        let mut next = order.to_vec();
        let n = next.len();
        if n < 2 {
            return next;
        }
        let kind = match self {
            NeighborMove::Mixed => match rng.random_range(0..3) {
                0 => NeighborMove::Swap,
                1 => NeighborMove::Reverse,
                _ => NeighborMove::Insert,
            },
            other => *other,
        };
        let (i, j) = distinct_pair(n, rng);
        match kind {
            NeighborMove::Swap => next.swap(i, j),
            NeighborMove::Insert => {
                let stop = next.remove(i);
                next.insert(j, stop);
            }
            _ => next[i.min(j)..=i.max(j)].reverse(),
        }
        next
    }
}

/// Two different positions in `0..n`. Requires `n >= 2`.
fn distinct_pair<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let i = rng.random_range(0..n);
    let mut j = rng.random_range(0..n - 1);
    if j >= i {
        j += 1;
    }
    (i, j)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Route;
    use crate::random::create_rng;

    const ALL: [NeighborMove; 4] = [
        NeighborMove::Swap,
        NeighborMove::Reverse,
        NeighborMove::Insert,
        NeighborMove::Mixed,
    ];

    #[test]
    fn test_moves_keep_permutation_and_change_order() {
        let mut rng = create_rng(5);
        let base: Vec<usize> = (0..9).collect();
        for mv in ALL {
            for _ in 0..200 {
                let next = mv.propose(&base, &mut rng);
                assert!(Route::new(next.clone()).is_permutation_of(9), "{mv:?}");
                assert_ne!(next, base, "{mv:?} produced an identical order");
            }
        }
    }

    #[test]
    fn test_tiny_orders() {
        let mut rng = create_rng(1);
        for mv in ALL {
            assert!(mv.propose(&[], &mut rng).is_empty());
            assert_eq!(mv.propose(&[4], &mut rng), vec![4]);
            assert_eq!(mv.propose(&[0, 1], &mut rng), vec![1, 0]);
        }
    }

    #[test]
    fn test_input_untouched() {
        let mut rng = create_rng(2);
        let base = vec![3, 1, 2, 0];
        let _ = NeighborMove::Swap.propose(&base, &mut rng);
        assert_eq!(base, vec![3, 1, 2, 0]);
    }
}
