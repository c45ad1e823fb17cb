//! Dense cost matrix built from a distance provider.

use rayon::prelude::*;

use crate::budget::Budget;
use crate::distance::DistanceProvider;
use crate::error::{Result, RouteError};
use crate::model::Stop;

/// Precomputed `n x n` travel costs.
///
/// Built once per run. Every provider value is validated here, so engines
/// can read costs without further error handling.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    n: usize,
    data: Vec<f64>,
    symmetric: bool,
}

impl CostMatrix {
    /// Queries `provider` for every ordered pair of distinct stops.
    ///
    /// The diagonal is zero and never queried. With `parallel` set, rows
    /// are computed on the rayon pool; the result is identical either way.
    ///
    /// # Errors
    ///
    /// [`RouteError::Provider`] if the provider fails or returns a NaN,
    /// infinite or negative cost.
    pub fn build<P: DistanceProvider + ?Sized>(
        stops: &[Stop],
        provider: &P,
        parallel: bool,
    ) -> Result<Self> {
        let n = stops.len();
        let row = |i: usize| -> Result<Vec<f64>> {
            let mut out = vec![0.0; n];
            for j in 0..n {
                if i != j {
                    out[j] = checked_cost(provider, &stops[i], &stops[j])?;
                }
            }
            Ok(out)
        };

        let rows: Vec<Vec<f64>> = if parallel {
            (0..n).into_par_iter().map(row).collect::<Result<_>>()?
        } else {
            (0..n).map(row).collect::<Result<_>>()?
        };

        Ok(Self::with_data(n, rows.into_iter().flatten().collect()))
    }

    /// Like [`build`](Self::build), but polls `budget` before every
    /// provider call.
    ///
    /// Returns `Ok(None)` once the budget runs out or the cancel flag is
    /// raised; the rows computed so far are discarded.
    ///
    /// # Errors
    ///
    /// [`RouteError::Provider`] as for [`build`](Self::build).
    pub fn build_within<P: DistanceProvider + ?Sized>(
        stops: &[Stop],
        provider: &P,
        parallel: bool,
        budget: &Budget,
    ) -> Result<Option<Self>> {
        let n = stops.len();
        let row = |i: usize| -> Result<Option<Vec<f64>>> {
            let mut out = vec![0.0; n];
            for j in 0..n {
                if i == j {
                    continue;
                }
                if budget.exhausted().is_some() {
                    return Ok(None);
                }
                out[j] = checked_cost(provider, &stops[i], &stops[j])?;
            }
            Ok(Some(out))
        };

        let rows: Vec<Option<Vec<f64>>> = if parallel {
            (0..n).into_par_iter().map(row).collect::<Result<_>>()?
        } else {
            (0..n).map(row).collect::<Result<_>>()?
        };

        let rows: Option<Vec<Vec<f64>>> = rows.into_iter().collect();
        Ok(rows.map(|rows| Self::with_data(n, rows.into_iter().flatten().collect())))
    }

    /// Builds a matrix from raw row-major values.
    ///
    /// # Errors
    ///
    /// [`RouteError::Input`] if `data.len() != n * n` or any value is not a
    /// finite non-negative number.
    pub fn from_vec(n: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != n * n {
            return Err(RouteError::input(format!(
                "cost matrix needs {} entries, got {}",
                n * n,
                data.len()
            )));
        }
        if let Some(bad) = data.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(RouteError::input(format!("invalid cost matrix entry {bad}")));
        }
        Ok(Self::with_data(n, data))
    }

    fn with_data(n: usize, data: Vec<f64>) -> Self {
        let symmetric = (0..n).all(|i| {
            ((i + 1)..n).all(|j| (data[i * n + j] - data[j * n + i]).abs() <= 1e-12)
        });
        Self { n, data, symmetric }
    }

    /// Number of stops.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Returns `true` for a matrix over zero stops.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Returns `true` if `get(i, j) == get(j, i)` for every pair.
    ///
    /// Segment reversals leave inner legs unchanged only on symmetric
    /// matrices; local search uses this to pick its delta formula.
    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// Cost from stop `i` to stop `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }
}

fn checked_cost<P: DistanceProvider + ?Sized>(provider: &P, a: &Stop, b: &Stop) -> Result<f64> {
    let value = provider.cost(a, b)?;
    if value.is_nan() {
        return Err(RouteError::provider(a.id(), b.id(), "cost is NaN"));
    }
    if value.is_infinite() {
        return Err(RouteError::provider(a.id(), b.id(), "cost is infinite"));
    }
    if value < 0.0 {
        return Err(RouteError::provider(
            a.id(),
            b.id(),
            format!("negative cost {value}"),
        ));
    }
    Ok(value)
}
