//! Pareto ranking utilities.
//!
//! All objectives are **minimized**. Objective vectors must be finite and
//! of equal length; anything else is a configuration error for the run,
//! since dominance is undefined for NaN.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II",
//!   IEEE Transactions on Evolutionary Computation, 6(2), 182-197

use crate::error::{Result, RouteError};

/// Pareto ranks of a set of objective vectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParetoRanking {
    /// Rank for each vector (0 = non-dominated).
    pub ranks: Vec<usize>,

    /// Indices grouped by front, each group ascending.
    pub fronts: Vec<Vec<usize>>,
}

/// Returns `true` if `a` Pareto-dominates `b`: no worse in every
/// objective and strictly better in at least one.
///
/// ```
/// use u_routeopt::nsga::dominates;
///
/// assert!(dominates(&[1.0, 2.0], &[1.0, 3.0]));
/// assert!(!dominates(&[1.0, 3.0], &[2.0, 1.0]));
/// assert!(!dominates(&[2.0, 2.0], &[2.0, 2.0]));
/// ```
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    let mut strictly_better = false;
    for (&va, &vb) in a.iter().zip(b) {
        if va > vb {
            return false;
        }
        if va < vb {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Fast non-dominated sorting, O(m·n²).
///
/// # Errors
///
/// [`RouteError::Configuration`] if a value is not finite or the vectors
/// differ in length.
///
/// ```
/// use u_routeopt::nsga::non_dominated_sort;
///
/// let objectives = vec![
///     vec![1.0, 5.0],
///     vec![3.0, 3.0],
///     vec![5.0, 1.0],
///     vec![4.0, 4.0], // dominated by (3, 3)
/// ];
/// let ranking = non_dominated_sort(&objectives).unwrap();
/// assert_eq!(ranking.ranks, vec![0, 0, 0, 1]);
/// assert_eq!(ranking.fronts, vec![vec![0, 1, 2], vec![3]]);
/// ```
pub fn non_dominated_sort<V: AsRef<[f64]>>(objectives: &[V]) -> Result<ParetoRanking> {
    check_objectives(objectives)?;
    let n = objectives.len();
    if n == 0 {
        return Ok(ParetoRanking {
            ranks: Vec::new(),
            fronts: Vec::new(),
        });
    }

    let mut dominated_count = vec![0usize; n];
    let mut dominates_list: Vec<Vec<usize>> = vec![Vec::new(); n];
    for i in 0..n {
        for j in (i + 1)..n {
            let (a, b) = (objectives[i].as_ref(), objectives[j].as_ref());
            if dominates(a, b) {
                dominates_list[i].push(j);
                dominated_count[j] += 1;
            } else if dominates(b, a) {
                dominates_list[j].push(i);
                dominated_count[i] += 1;
            }
        }
    }

    let mut ranks = vec![0usize; n];
    let mut fronts = Vec::new();
    let mut current: Vec<usize> = (0..n).filter(|&i| dominated_count[i] == 0).collect();
    while !current.is_empty() {
        let mut next = Vec::new();
        for &i in &current {
            ranks[i] = fronts.len();
            for &j in &dominates_list[i] {
                dominated_count[j] -= 1;
                if dominated_count[j] == 0 {
                    next.push(j);
                }
            }
        }
        next.sort_unstable();
        fronts.push(current);
        current = next;
    }

    Ok(ParetoRanking { ranks, fronts })
}

/// Crowding distance of each index in `members`, aligned with `members`.
///
/// Boundary members of every objective get `f64::INFINITY`. Fronts of one
/// or two members are all boundary. An objective with zero range adds
/// nothing.
pub fn crowding_distance<V: AsRef<[f64]>>(objectives: &[V], members: &[usize]) -> Vec<f64> {
    let n = members.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let m = objectives[members[0]].as_ref().len();
    let mut distances = vec![0.0f64; n];
    let mut order: Vec<usize> = (0..n).collect();

    for k in 0..m {
        let value = |pos: usize| objectives[members[pos]].as_ref()[k];
        // Stable, so equal values keep member order.
        order.sort_by(|&a, &b| value(a).total_cmp(&value(b)));

        distances[order[0]] = f64::INFINITY;
        distances[order[n - 1]] = f64::INFINITY;

        let range = value(order[n - 1]) - value(order[0]);
        if range > 0.0 {
            for w in 1..(n - 1) {
                distances[order[w]] += (value(order[w + 1]) - value(order[w - 1])) / range;
            }
        }
    }

    distances
}

/// Picks the best compromise among `members`: the smallest weighted
/// Euclidean distance to the ideal point after min-max normalizing each
/// objective over `members`. Empty `weights` means equal weights. Ties go
/// to the earlier member.
///
/// Returns a position in `members`, or `None` if it is empty.
///
/// ```
/// use u_routeopt::nsga::best_compromise;
///
/// let objectives = vec![vec![0.0, 10.0], vec![4.0, 4.0], vec![10.0, 0.0]];
/// assert_eq!(best_compromise(&objectives, &[0, 1, 2], &[]), Some(1));
/// // Weighting the first objective heavily favours its minimizer.
/// assert_eq!(best_compromise(&objectives, &[0, 1, 2], &[10.0, 1.0]), Some(0));
/// ```
pub fn best_compromise<V: AsRef<[f64]>>(
    objectives: &[V],
    members: &[usize],
    weights: &[f64],
) -> Option<usize> {
    let first = *members.first()?;
    let m = objectives[first].as_ref().len();

    let mut lo = vec![f64::INFINITY; m];
    let mut hi = vec![f64::NEG_INFINITY; m];
    for &i in members {
        for (k, &v) in objectives[i].as_ref().iter().enumerate() {
            lo[k] = lo[k].min(v);
            hi[k] = hi[k].max(v);
        }
    }

    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (pos, &i) in members.iter().enumerate() {
        let distance: f64 = objectives[i]
            .as_ref()
            .iter()
            .enumerate()
            .map(|(k, &v)| {
                let range = hi[k] - lo[k];
                let norm = if range > 0.0 { (v - lo[k]) / range } else { 0.0 };
                weights.get(k).copied().unwrap_or(1.0) * norm * norm
            })
            .sum::<f64>()
            .sqrt();
        if distance < best_distance {
            best = pos;
            best_distance = distance;
        }
    }
    Some(best)
}

fn check_objectives<V: AsRef<[f64]>>(objectives: &[V]) -> Result<()> {
    let Some(first) = objectives.first() else {
        return Ok(());
    };
    let m = first.as_ref().len();
    for (i, v) in objectives.iter().enumerate() {
        let v = v.as_ref();
        if v.len() != m {
            return Err(RouteError::config(format!(
                "objective vector {i} has {} values, expected {m}",
                v.len()
            )));
        }
        if let Some(k) = v.iter().position(|x| !x.is_finite()) {
            return Err(RouteError::config(format!(
                "objective {k} of solution {i} is not finite ({})",
                v[k]
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dominance_relation() {
        assert!(dominates(&[1.0, 1.0], &[2.0, 2.0]));
        assert!(!dominates(&[2.0, 2.0], &[1.0, 1.0]));
        assert!(dominates(&[1.0, 2.0], &[1.0, 2.5]));
        assert!(!dominates(&[1.0, 3.0], &[3.0, 1.0]));
        assert!(!dominates(&[1.0, 3.0], &[1.0, 3.0]));
    }

    #[test]
    fn test_empty_and_single() {
        let empty: Vec<Vec<f64>> = Vec::new();
        assert!(non_dominated_sort(&empty).unwrap().fronts.is_empty());

        let one = non_dominated_sort(&[vec![1.0, 2.0]]).unwrap();
        assert_eq!(one.ranks, vec![0]);
        assert_eq!(one.fronts, vec![vec![0]]);
    }

    #[test]
    fn test_chain_of_fronts() {
        let objs = vec![vec![3.0, 3.0], vec![1.0, 1.0], vec![2.0, 2.0]];
        let ranking = non_dominated_sort(&objs).unwrap();
        assert_eq!(ranking.ranks, vec![2, 0, 1]);
        assert_eq!(ranking.fronts, vec![vec![1], vec![2], vec![0]]);
    }

    #[test]
    fn test_mixed_fronts() {
        let objs = vec![
            vec![1.0, 5.0],
            vec![3.0, 3.0],
            vec![5.0, 1.0],
            vec![4.0, 4.0],
            vec![6.0, 6.0],
        ];
        let ranking = non_dominated_sort(&objs).unwrap();
        assert_eq!(ranking.ranks, vec![0, 0, 0, 1, 2]);
    }

    #[test]
    fn test_identical_vectors_share_a_front() {
        let objs = vec![vec![2.0, 2.0]; 3];
        let ranking = non_dominated_sort(&objs).unwrap();
        assert!(ranking.ranks.iter().all(|&r| r == 0));
    }

    #[test]
    fn test_front_members_are_mutually_non_dominated() {
        let objs: Vec<Vec<f64>> = (0..30)
            .map(|i| {
                let x = (i * 7 % 30) as f64;
                let y = (i * 11 % 30) as f64;
                vec![x, y, (x - y).abs()]
            })
            .collect();
        let ranking = non_dominated_sort(&objs).unwrap();
        for front in &ranking.fronts {
            for &a in front {
                for &b in front {
                    assert!(!dominates(&objs[a], &objs[b]));
                }
            }
        }
        let total: usize = ranking.fronts.iter().map(Vec::len).sum();
        assert_eq!(total, 30);
    }

    #[test]
    fn test_nan_is_a_configuration_error() {
        let objs = vec![vec![1.0, f64::NAN], vec![2.0, 2.0]];
        assert!(matches!(
            non_dominated_sort(&objs),
            Err(RouteError::Configuration(_))
        ));
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        let objs = vec![vec![1.0, 2.0], vec![2.0]];
        assert!(non_dominated_sort(&objs).is_err());
    }

    #[test]
    fn test_crowding_small_fronts() {
        let objs = vec![vec![1.0, 3.0], vec![3.0, 1.0]];
        assert!(crowding_distance(&objs, &[0]).iter().all(|d| d.is_infinite()));
        assert!(crowding_distance(&objs, &[0, 1]).iter().all(|d| d.is_infinite()));
    }

    #[test]
    fn test_crowding_evenly_spaced() {
        let objs = vec![
            vec![0.0, 4.0],
            vec![1.0, 3.0],
            vec![2.0, 2.0],
            vec![3.0, 1.0],
            vec![4.0, 0.0],
        ];
        let dist = crowding_distance(&objs, &[0, 1, 2, 3, 4]);
        assert!(dist[0].is_infinite());
        assert!(dist[4].is_infinite());
        // (2 - 0) / 4 per objective, two objectives.
        for d in &dist[1..4] {
            assert!((d - 1.0).abs() < 1e-12, "got {d}");
        }
    }

    #[test]
    fn test_crowding_subset_alignment() {
        let objs = vec![
            vec![9.0, 9.0],
            vec![0.0, 2.0],
            vec![1.0, 1.0],
            vec![2.0, 0.0],
        ];
        let dist = crowding_distance(&objs, &[3, 1, 2]);
        assert!(dist[0].is_infinite());
        assert!(dist[1].is_infinite());
        assert!((dist[2] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_crowding_zero_range_objective() {
        let objs = vec![vec![1.0, 5.0], vec![2.0, 5.0], vec![3.0, 5.0]];
        let dist = crowding_distance(&objs, &[0, 1, 2]);
        assert!(dist[1].is_finite());
        assert!((dist[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_compromise_ties_prefer_earlier() {
        let objs = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        assert_eq!(best_compromise(&objs, &[0, 1], &[]), Some(0));
        assert_eq!(best_compromise(&objs, &[1, 0], &[]), Some(0));
        let empty: Vec<Vec<f64>> = Vec::new();
        assert_eq!(best_compromise(&empty, &[], &[]), None);
    }

    #[test]
    fn test_compromise_single_member() {
        let objs = vec![vec![3.0, 4.0]];
        assert_eq!(best_compromise(&objs, &[0], &[1.0, 1.0]), Some(0));
    }
}
