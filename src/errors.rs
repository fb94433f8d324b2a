//! Error definitions for the breaker API boundary.

use thiserror::Error;

/// Errors surfaced by [`Breaker::execute`](crate::Breaker::execute).
///
/// The downstream error type `E` is the caller's own; it is forwarded
/// verbatim, never wrapped in a message of ours.
#[derive(Debug, Error)]
pub enum BreakerError<E> {
    /// Admission was denied by the current breaker state. The wrapped
    /// operation did not run.
    #[error("request dropped early by circuit breaker")]
    RequestDropped,

    /// The wrapped operation ran and returned this error. It has already
    /// been counted against the failure window.
    #[error("{0}")]
    Downstream(E),
}

impl<E> BreakerError<E> {
    /// True when the call never reached the downstream.
    pub fn is_dropped(&self) -> bool {
        matches!(self, BreakerError::RequestDropped)
    }

    /// The downstream error, if the call got that far.
    pub fn into_downstream(self) -> Option<E> {
        match self {
            BreakerError::RequestDropped => None,
            BreakerError::Downstream(err) => Some(err),
        }
    }
}

/// Construction-time validation failure. Names the offending config field
/// and the constraint it violated; the breaker is not created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid breaker config: {field}: {reason}")]
pub struct ConfigError {
    pub field: &'static str,
    pub reason: String,
}

impl ConfigError {
    pub(crate) fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}
