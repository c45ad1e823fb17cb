//! Distance providers.
//!
//! The optimizer treats travel cost as an opaque, injected capability. A
//! provider may compute great-circle distances, read a precomputed table or
//! front a remote routing service. Providers must be safe for concurrent
//! reads because independent runs may share one.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::Result;
use crate::model::Stop;

/// Mean Earth radius in kilometres (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Computes the travel cost between two stops.
///
/// Implementations may fail; a failure aborts the run with
/// [`RouteError::Provider`](crate::error::RouteError::Provider). Returned
/// values are validated by [`CostMatrix::build`](crate::model::CostMatrix::build):
/// NaN, infinite and negative costs are rejected.
pub trait DistanceProvider: Send + Sync {
    /// Cost of travelling from `from` to `to`.
    fn cost(&self, from: &Stop, to: &Stop) -> Result<f64>;
}

impl<F> DistanceProvider for F
where
    F: Fn(&Stop, &Stop) -> f64 + Send + Sync,
{
    fn cost(&self, from: &Stop, to: &Stop) -> Result<f64> {
        Ok(self(from, to))
    }
}

/// Great-circle distance in kilometres.
#[derive(Debug, Clone, Copy)]
pub struct Haversine {
    radius_km: f64,
}

impl Default for Haversine {
    fn default() -> Self {
        Self {
            radius_km: EARTH_RADIUS_KM,
        }
    }
}

impl Haversine {
    /// Uses a custom sphere radius (e.g. 3958.8 for miles).
    pub fn with_radius(radius_km: f64) -> Self {
        Self { radius_km }
    }

    /// Distance between two coordinate pairs in degrees.
    pub fn distance(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
        let (lat1, lat2) = (lat1.to_radians(), lat2.to_radians());
        let dlat = lat2 - lat1;
        let dlon = (lon2 - lon1).to_radians();
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * self.radius_km * a.sqrt().min(1.0).asin()
    }
}

impl DistanceProvider for Haversine {
    fn cost(&self, from: &Stop, to: &Stop) -> Result<f64> {
        Ok(self.distance(from.lat(), from.lon(), to.lat(), to.lon()))
    }
}

/// Planar distance treating longitude as `x` and latitude as `y`.
///
/// Useful for synthetic instances and small-area approximations.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl DistanceProvider for Euclidean {
    fn cost(&self, from: &Stop, to: &Stop) -> Result<f64> {
        Ok((from.lon() - to.lon()).hypot(from.lat() - to.lat()))
    }
}

/// Memoizing wrapper around another provider.
///
/// The cache is owned by the wrapper and keyed by `(from id, to id)`.
/// Concurrent misses on the same key may both call the inner provider and
/// both write; the writes are idempotent so no extra coordination is done.
/// Failed lookups are not cached.
///
/// # Examples
///
/// ```
/// use u_routeopt::distance::{CachedProvider, DistanceProvider, Haversine};
/// use u_routeopt::model::Stop;
///
/// let provider = CachedProvider::new(Haversine::default());
/// let a = Stop::new("a", 37.56, 126.97);
/// let b = Stop::new("b", 35.17, 129.07);
/// let first = provider.cost(&a, &b).unwrap();
/// let second = provider.cost(&a, &b).unwrap();
/// assert_eq!(first, second);
/// assert_eq!(provider.len(), 1);
/// ```
#[derive(Debug)]
pub struct CachedProvider<P> {
    inner: P,
    cache: RwLock<HashMap<(String, String), f64>>,
}

impl<P: DistanceProvider> CachedProvider<P> {
    /// Wraps `inner` with an empty cache.
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Number of cached pairs.
    pub fn len(&self) -> usize {
        self.cache.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached pair.
    pub fn clear(&self) {
        self.cache.write().unwrap_or_else(|e| e.into_inner()).clear();
    }

    /// The wrapped provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: DistanceProvider> DistanceProvider for CachedProvider<P> {
    fn cost(&self, from: &Stop, to: &Stop) -> Result<f64> {
        let key = (from.id().to_string(), to.id().to_string());
        if let Some(&hit) = self.cache.read().unwrap_or_else(|e| e.into_inner()).get(&key) {
            return Ok(hit);
        }
        let value = self.inner.cost(from, to)?;
        self.cache
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, value);
        Ok(value)
    }
}
