//! Permutation crossover and mutation operators.
//!
//! Every operator works on stop-index permutations and always returns or
//! edits an owned buffer; parents are only read.
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains" (OX)
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman
//!   Problem" (PMX)

use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Crossover operator used to recombine two parent routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Crossover {
    /// Order crossover (OX): keeps a slice of parent A in place and fills
    /// the rest in parent B's relative order. Preserves adjacency well,
    /// which is what tour cost depends on.
    #[default]
    Order,
    /// Partially mapped crossover (PMX): keeps a slice of parent A and
    /// places the rest at parent B's absolute positions where possible.
    PartiallyMapped,
}

impl Crossover {
    /// Produces two offspring from two parents of equal length.
    pub fn apply<R: Rng>(self, a: &[usize], b: &[usize], rng: &mut R) -> (Vec<usize>, Vec<usize>) {
        match self {
            Crossover::Order => order_crossover(a, b, rng),
            Crossover::PartiallyMapped => pmx_crossover(a, b, rng),
        }
    }
}

/// Mutation operator applied to an offspring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Mutation {
    /// Exchange two random positions.
    #[default]
    Swap,
    /// Move one stop to another position.
    Insert,
    /// Reverse a random segment.
    Invert,
}

impl Mutation {
    /// Mutates `perm` in place.
    pub fn apply<R: Rng>(self, perm: &mut Vec<usize>, rng: &mut R) {
        match self {
            Mutation::Swap => swap_mutation(perm, rng),
            Mutation::Insert => insert_mutation(perm, rng),
            Mutation::Invert => invert_mutation(perm, rng),
        }
    }
}

/// Order crossover (OX).
///
/// A random segment `[lo, hi]` is copied from one parent; the remaining
/// slots, starting after `hi` and wrapping around, receive the other
/// parent's genes in the order they appear after `hi`.
///
/// Parents of length 0 or 1 are returned as-is.
pub fn order_crossover<R: Rng>(a: &[usize], b: &[usize], rng: &mut R) -> (Vec<usize>, Vec<usize>) {
    debug_assert_eq!(a.len(), b.len(), "parents must have equal length");
    if a.len() < 2 {
        return (a.to_vec(), b.to_vec());
    }
    let (lo, hi) = random_segment(a.len(), rng);
    (ox_child(a, b, lo, hi), ox_child(b, a, lo, hi))
}

fn ox_child(keep: &[usize], fill: &[usize], lo: usize, hi: usize) -> Vec<usize> {
    let n = keep.len();
    let mut child = keep.to_vec();
    let mut taken = vec![false; n];
    for &g in &keep[lo..=hi] {
        taken[g] = true;
    }
    let mut slot = (hi + 1) % n;
    for k in 1..=n {
        let g = fill[(hi + k) % n];
        if !taken[g] {
            child[slot] = g;
            slot = (slot + 1) % n;
        }
    }
    child
}

/// Partially mapped crossover (PMX).
///
/// Parents of length 0 or 1 are returned as-is.
pub fn pmx_crossover<R: Rng>(a: &[usize], b: &[usize], rng: &mut R) -> (Vec<usize>, Vec<usize>) {
    debug_assert_eq!(a.len(), b.len(), "parents must have equal length");
    if a.len() < 2 {
        return (a.to_vec(), b.to_vec());
    }
    let (lo, hi) = random_segment(a.len(), rng);
    (pmx_child(a, b, lo, hi), pmx_child(b, a, lo, hi))
}

fn pmx_child(keep: &[usize], fill: &[usize], lo: usize, hi: usize) -> Vec<usize> {
    let n = keep.len();
    // where_in_fill[g] = position of gene g in `fill`
    let mut where_in_fill = vec![0usize; n];
    for (pos, &g) in fill.iter().enumerate() {
        where_in_fill[g] = pos;
    }
    let mut in_segment = vec![false; n];
    for &g in &keep[lo..=hi] {
        in_segment[g] = true;
    }

    let mut child = fill.to_vec();
    child[lo..=hi].copy_from_slice(&keep[lo..=hi]);

    // Genes of `fill`'s segment displaced by the copy must find a slot
    // outside the segment by following the keep -> fill mapping.
    for pos in lo..=hi {
        let g = fill[pos];
        if in_segment[g] {
            continue;
        }
        let mut target = pos;
        while (lo..=hi).contains(&target) {
            target = where_in_fill[keep[target]];
        }
        child[target] = g;
    }
    child
}

/// Exchanges two random positions.
pub fn swap_mutation<R: Rng>(perm: &mut [usize], rng: &mut R) {
    let n = perm.len();
    if n < 2 {
        return;
    }
    let i = rng.random_range(0..n);
    let j = rng.random_range(0..n);
    perm.swap(i, j);
}

/// Removes a random stop and reinserts it at a random position.
pub fn insert_mutation<R: Rng>(perm: &mut Vec<usize>, rng: &mut R) {
    let n = perm.len();
    if n < 2 {
        return;
    }
    let g = perm.remove(rng.random_range(0..n));
    perm.insert(rng.random_range(0..n), g);
}

/// Reverses a random segment.
pub fn invert_mutation<R: Rng>(perm: &mut [usize], rng: &mut R) {
    let n = perm.len();
    if n < 2 {
        return;
    }
    let (lo, hi) = random_segment(n, rng);
    perm[lo..=hi].reverse();
}

/// Random `(lo, hi)` with `lo <= hi < n`.
pub(crate) fn random_segment<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    (a.min(b), a.max(b))
}
