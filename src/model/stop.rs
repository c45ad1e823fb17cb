//! Stops and time windows.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, RouteError};

/// Arrival window `[earliest, latest]` at a stop, in travel-time units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeWindow {
    earliest: f64,
    latest: f64,
}

impl TimeWindow {
    /// Creates a window. Validation happens in [`validate_stops`].
    pub fn new(earliest: f64, latest: f64) -> Self {
        Self { earliest, latest }
    }

    /// Earliest allowed service start.
    pub fn earliest(&self) -> f64 {
        self.earliest
    }

    /// Latest allowed arrival.
    pub fn latest(&self) -> f64 {
        self.latest
    }

    /// How late an arrival at `arrival` is (0 if on time).
    pub fn lateness(&self, arrival: f64) -> f64 {
        (arrival - self.latest).max(0.0)
    }

    /// How long a vehicle arriving at `arrival` waits before service.
    pub fn waiting_time(&self, arrival: f64) -> f64 {
        (self.earliest - arrival).max(0.0)
    }
}

/// A geographic point to visit.
///
/// Stops are created by the caller and are read-only for the whole run;
/// engines only ever reorder indices into the caller's slice.
///
/// # Examples
///
/// ```
/// use u_routeopt::model::{Stop, TimeWindow};
///
/// let stop = Stop::new("store-17", 37.5665, 126.9780)
///     .with_time_window(TimeWindow::new(0.0, 120.0))
///     .with_service_duration(15.0)
///     .with_priority(2.0);
/// assert_eq!(stop.id(), "store-17");
/// assert_eq!(stop.priority(), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Stop {
    id: String,
    lat: f64,
    lon: f64,
    time_window: Option<TimeWindow>,
    service_duration: f64,
    priority: f64,
}

impl Stop {
    /// Creates a stop with no time window, zero service time and priority 1.
    pub fn new(id: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lon,
            time_window: None,
            service_duration: 0.0,
            priority: 1.0,
        }
    }

    /// Sets the arrival window.
    pub fn with_time_window(mut self, window: TimeWindow) -> Self {
        self.time_window = Some(window);
        self
    }

    /// Sets the service duration spent at the stop.
    pub fn with_service_duration(mut self, duration: f64) -> Self {
        self.service_duration = duration;
        self
    }

    /// Sets the priority weight. Higher means "visit earlier".
    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = priority;
        self
    }

    /// Unique identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Arrival window, if any.
    pub fn time_window(&self) -> Option<&TimeWindow> {
        self.time_window.as_ref()
    }

    /// Service duration at this stop.
    pub fn service_duration(&self) -> f64 {
        self.service_duration
    }

    /// Priority weight.
    pub fn priority(&self) -> f64 {
        self.priority
    }
}

/// Checks stop data before a run starts.
///
/// Rejects empty or duplicate ids, non-finite or out-of-range coordinates,
/// inverted time windows and negative service times or priorities.
pub fn validate_stops(stops: &[Stop]) -> Result<()> {
    let mut seen = std::collections::HashSet::with_capacity(stops.len());
    for (i, stop) in stops.iter().enumerate() {
        if stop.id.is_empty() {
            return Err(RouteError::input(format!("stop at index {i} has an empty id")));
        }
        if !seen.insert(stop.id.as_str()) {
            return Err(RouteError::input(format!("duplicate stop id '{}'", stop.id)));
        }
        if !stop.lat.is_finite() || !stop.lon.is_finite() {
            return Err(RouteError::input(format!(
                "stop '{}' is missing coordinates",
                stop.id
            )));
        }
        if !(-90.0..=90.0).contains(&stop.lat) || !(-180.0..=180.0).contains(&stop.lon) {
            return Err(RouteError::input(format!(
                "stop '{}' has out-of-range coordinates ({}, {})",
                stop.id, stop.lat, stop.lon
            )));
        }
        if let Some(tw) = stop.time_window {
            if !tw.earliest.is_finite() || !tw.latest.is_finite() || tw.earliest > tw.latest {
                return Err(RouteError::input(format!(
                    "stop '{}' has an invalid time window [{}, {}]",
                    stop.id, tw.earliest, tw.latest
                )));
            }
        }
        if !stop.service_duration.is_finite() || stop.service_duration < 0.0 {
            return Err(RouteError::input(format!(
                "stop '{}' has a negative service duration",
                stop.id
            )));
        }
        if !stop.priority.is_finite() || stop.priority < 0.0 {
            return Err(RouteError::input(format!(
                "stop '{}' has an invalid priority {}",
                stop.id, stop.priority
            )));
        }
    }
    Ok(())
}
