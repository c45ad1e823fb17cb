//! Objective functions for multi-objective optimization.
//!
//! Each [`Objective`] maps an ordering to a scalar to be minimized. The
//! NSGA-II engine evaluates a fixed, ordered list of them per route.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, RouteError};
use crate::model::Stop;
use crate::scoring::Scorer;

/// A route quality measure. Lower is better for every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Objective {
    /// Total travel cost (`distance`).
    Distance,
    /// Sum of arrival lateness over all time windows (`time_window`).
    TimeWindowViolation,
    /// Standard deviation of leg costs (`balance`).
    LoadBalance,
    /// Priority-weighted visiting position (`priority`).
    PriorityDelay,
}

impl Objective {
    /// Stable identifier accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            Objective::Distance => "distance",
            Objective::TimeWindowViolation => "time_window",
            Objective::LoadBalance => "balance",
            Objective::PriorityDelay => "priority",
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Objective {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "distance" => Ok(Objective::Distance),
            "time_window" | "time_window_violation" => Ok(Objective::TimeWindowViolation),
            "balance" | "load_balance" => Ok(Objective::LoadBalance),
            "priority" | "priority_delay" => Ok(Objective::PriorityDelay),
            other => Err(RouteError::config(format!("unknown objective '{other}'"))),
        }
    }
}

/// Everything needed to evaluate objectives for one run.
#[derive(Debug, Clone, Copy)]
pub struct ObjectiveContext<'a> {
    scorer: Scorer<'a>,
    stops: &'a [Stop],
    travel_time_factor: f64,
}

impl<'a> ObjectiveContext<'a> {
    /// `travel_time_factor` converts one unit of travel cost into time units
    /// for time-window checks.
    pub fn new(scorer: Scorer<'a>, stops: &'a [Stop], travel_time_factor: f64) -> Self {
        Self {
            scorer,
            stops,
            travel_time_factor,
        }
    }

    /// Evaluates a single objective.
    pub fn evaluate(&self, objective: Objective, order: &[usize]) -> f64 {
        match objective {
            Objective::Distance => self.scorer.cost_of(order),
            Objective::TimeWindowViolation => self.lateness(order),
            Objective::LoadBalance => self.leg_deviation(order),
            Objective::PriorityDelay => self.priority_delay(order),
        }
    }

    /// Evaluates every objective in order.
    ///
    /// # Errors
    ///
    /// [`RouteError::Configuration`] if any objective yields NaN; dominance
    /// comparisons are undefined for such vectors.
    pub fn evaluate_all(&self, objectives: &[Objective], order: &[usize]) -> Result<Vec<f64>> {
        objectives
            .iter()
            .map(|&o| {
                let v = self.evaluate(o, order);
                if v.is_nan() {
                    Err(RouteError::config(format!("objective '{o}' produced NaN")))
                } else {
                    Ok(v)
                }
            })
            .collect()
    }

    fn lateness(&self, order: &[usize]) -> f64 {
        let matrix = self.scorer.matrix();
        let mut clock = 0.0;
        let mut late = 0.0;
        let mut prev: Option<usize> = None;
        for &s in order {
            if let Some(p) = prev {
                clock += matrix.get(p, s) * self.travel_time_factor;
            }
            let stop = &self.stops[s];
            if let Some(tw) = stop.time_window() {
                late += tw.lateness(clock);
                clock += tw.waiting_time(clock);
            }
            clock += stop.service_duration();
            prev = Some(s);
        }
        late
    }

    fn leg_deviation(&self, order: &[usize]) -> f64 {
        if order.len() < 2 {
            return 0.0;
        }
        let matrix = self.scorer.matrix();
        let mut legs: Vec<f64> = order.windows(2).map(|w| matrix.get(w[0], w[1])).collect();
        if self.scorer.is_closed() {
            legs.push(matrix.get(order[order.len() - 1], order[0]));
        }
        let mean = legs.iter().sum::<f64>() / legs.len() as f64;
        let var = legs.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / legs.len() as f64;
        var.sqrt()
    }

    fn priority_delay(&self, order: &[usize]) -> f64 {
        let n = order.len().max(1) as f64;
        order
            .iter()
            .enumerate()
            .map(|(pos, &s)| self.stops[s].priority() * pos as f64 / n)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::Euclidean;
    use crate::model::{CostMatrix, TimeWindow};

    fn line_stops() -> Vec<Stop> {
        vec![
            Stop::new("a", 0.0, 0.0),
            Stop::new("b", 0.0, 1.0).with_time_window(TimeWindow::new(0.0, 1.0)),
            Stop::new("c", 0.0, 3.0).with_priority(5.0),
        ]
    }

    #[test]
    fn test_parse_identifiers() {
        assert_eq!("distance".parse::<Objective>().unwrap(), Objective::Distance);
        assert_eq!(
            "time_window".parse::<Objective>().unwrap(),
            Objective::TimeWindowViolation
        );
        assert_eq!("Balance".parse::<Objective>().unwrap(), Objective::LoadBalance);
        assert_eq!("priority".parse::<Objective>().unwrap(), Objective::PriorityDelay);
        assert!(matches!(
            "fuel".parse::<Objective>(),
            Err(RouteError::Configuration(_))
        ));
    }

    #[test]
    fn test_display_round_trips() {
        for o in [
            Objective::Distance,
            Objective::TimeWindowViolation,
            Objective::LoadBalance,
            Objective::PriorityDelay,
        ] {
            assert_eq!(o.to_string().parse::<Objective>().unwrap(), o);
        }
    }

    #[test]
    fn test_time_window_lateness() {
        let stops = line_stops();
        let m = CostMatrix::build(&stops, &Euclidean, false).unwrap();
        let ctx = ObjectiveContext::new(Scorer::new(&m, false), &stops, 1.0);
        // a -> b arrives at 1.0: on time.
        assert_eq!(ctx.evaluate(Objective::TimeWindowViolation, &[0, 1, 2]), 0.0);
        // a -> c -> b arrives at b at 3 + 2 = 5: 4 late.
        assert!((ctx.evaluate(Objective::TimeWindowViolation, &[0, 2, 1]) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_leg_deviation() {
        let stops = line_stops();
        let m = CostMatrix::build(&stops, &Euclidean, false).unwrap();
        let ctx = ObjectiveContext::new(Scorer::new(&m, false), &stops, 1.0);
        // legs 1 and 2 -> std dev 0.5
        assert!((ctx.evaluate(Objective::LoadBalance, &[0, 1, 2]) - 0.5).abs() < 1e-12);
        assert_eq!(ctx.evaluate(Objective::LoadBalance, &[0]), 0.0);
    }

    #[test]
    fn test_priority_delay_prefers_early_high_priority() {
        let stops = line_stops();
        let m = CostMatrix::build(&stops, &Euclidean, false).unwrap();
        let ctx = ObjectiveContext::new(Scorer::new(&m, false), &stops, 1.0);
        let late = ctx.evaluate(Objective::PriorityDelay, &[0, 1, 2]);
        let early = ctx.evaluate(Objective::PriorityDelay, &[2, 0, 1]);
        assert!(early < late);
    }

    #[test]
    fn test_evaluate_all_order() {
        let stops = line_stops();
        let m = CostMatrix::build(&stops, &Euclidean, false).unwrap();
        let ctx = ObjectiveContext::new(Scorer::new(&m, false), &stops, 1.0);
        let v = ctx
            .evaluate_all(&[Objective::Distance, Objective::TimeWindowViolation], &[0, 1, 2])
            .unwrap();
        assert_eq!(v, vec![3.0, 0.0]);
    }
}
