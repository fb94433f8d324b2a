//! Metrics emission for breaker activity.

use metrics::{counter, gauge};

use crate::breaker::state::{Outcome, State};

/// Record a settled downstream call.
pub(crate) fn record_call(breaker: &str, outcome: Outcome) {
    counter!(
        "circuit_breaker_requests_total",
        "breaker" => breaker.to_string()
    )
    .increment(1);
    if outcome.is_failure() {
        counter!(
            "circuit_breaker_failures_total",
            "breaker" => breaker.to_string()
        )
        .increment(1);
    }
}

/// Record an admission denial.
pub(crate) fn record_rejected(breaker: &str) {
    counter!(
        "circuit_breaker_rejected_total",
        "breaker" => breaker.to_string()
    )
    .increment(1);
}

/// Record a state transition and update the state gauge.
pub(crate) fn record_transition(breaker: &str, from: State, to: State) {
    counter!(
        "circuit_breaker_transitions_total",
        "breaker" => breaker.to_string(),
        "from" => from.to_string(),
        "to" => to.to_string()
    )
    .increment(1);
    gauge!(
        "circuit_breaker_state",
        "breaker" => breaker.to_string()
    )
    .set(to.gauge_value());
}
