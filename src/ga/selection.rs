//! Parent selection strategies.
//!
//! All strategies assume minimization (lower fitness is better).
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Baker (1985), "Adaptive Selection Methods for Genetic Algorithms"

use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::types::Individual;

/// Selection strategy for choosing parents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Selection {
    /// Draw `k` individuals with replacement and keep the fittest.
    ///
    /// Larger `k` means stronger selection pressure.
    Tournament(usize),

    /// Linear ranking: the `r`-th best of `n` gets weight `n - r`.
    ///
    /// Expects a population sorted best-first, which the runner guarantees.
    Rank,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(3)
    }
}

impl Selection {
    /// Picks a parent index from a non-empty population.
    pub fn select<I: Individual, R: Rng>(&self, population: &[I], rng: &mut R) -> usize {
        debug_assert!(!population.is_empty(), "cannot select from empty population");
        match *self {
            Selection::Tournament(k) => tournament(population, k, rng),
            Selection::Rank => rank(population.len(), rng),
        }
    }

    /// Tournament size, if this is tournament selection.
    pub fn tournament_size(&self) -> Option<usize> {
        match *self {
            Selection::Tournament(k) => Some(k),
            Selection::Rank => None,
        }
    }
}

fn tournament<I: Individual, R: Rng>(population: &[I], k: usize, rng: &mut R) -> usize {
    let n = population.len();
    let mut winner = rng.random_range(0..n);
    for _ in 1..k.max(1) {
        let challenger = rng.random_range(0..n);
        if population[challenger].fitness() < population[winner].fitness() {
            winner = challenger;
        }
    }
    winner
}

fn rank<R: Rng>(n: usize, rng: &mut R) -> usize {
    if n == 1 {
        return 0;
    }
    let total = (n * (n + 1) / 2) as f64;
    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for r in 0..n {
        cumulative += (n - r) as f64;
        if cumulative > threshold {
            return r;
        }
    }
    n - 1
}
