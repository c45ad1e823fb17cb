//! Error taxonomy for optimization runs.
//!
//! Budget exhaustion is not an error: a run that hits its time limit
//! still produces an [`OptimizationResult`](crate::optimizer::OptimizationResult)
//! flagged with [`Termination::BudgetExceeded`](crate::budget::Termination).

use thiserror::Error;

/// Errors surfaced by the optimizer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// Invalid parameters. Raised before any engine iteration begins.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Malformed stop data (duplicate ids, non-finite coordinates, ...).
    #[error("invalid input: {0}")]
    Input(String),

    /// The injected distance provider failed or returned an unusable value.
    #[error("distance provider failed for {from} -> {to}: {reason}")]
    Provider {
        /// Id of the origin stop.
        from: String,
        /// Id of the destination stop.
        to: String,
        /// What went wrong.
        reason: String,
    },
}

impl RouteError {
    /// Shorthand for [`RouteError::Configuration`].
    pub fn config(msg: impl Into<String>) -> Self {
        RouteError::Configuration(msg.into())
    }

    /// Shorthand for [`RouteError::Input`].
    pub fn input(msg: impl Into<String>) -> Self {
        RouteError::Input(msg.into())
    }

    /// Shorthand for [`RouteError::Provider`].
    pub fn provider(from: &str, to: &str, reason: impl Into<String>) -> Self {
        RouteError::Provider {
            from: from.to_string(),
            to: to.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns `true` when the caller can fix the error by changing the
    /// request (4xx-equivalent); provider failures are server-side (5xx).
    pub fn is_caller_error(&self) -> bool {
        matches!(self, RouteError::Configuration(_) | RouteError::Input(_))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RouteError>;
