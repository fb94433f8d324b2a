//! The breaker facade: admission, outcome recording, state transitions.
//!
//! # State Transitions
//! ```text
//! Closed → Open: failure ratio over threshold with enough samples
//! Open → Half-Open: cooling period elapsed, next caller probes
//! Half-Open → Closed: every admission stage passed
//! Half-Open → Open: probe failures push the ratio back over threshold
//! ```
//!
//! # Design Decisions
//! - One exclusive lock guards all mutable state; it is released across the
//!   user-supplied call so a slow downstream cannot stall other callers
//! - No background timer; every time-driven transition happens on the next
//!   caller's clock reading
//! - Monotonic clock (`Instant`) throughout; wall-clock jumps cannot cause
//!   spurious transitions

use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::Serialize;

use crate::breaker::half_open::{HalfOpenController, StageVerdict};
use crate::breaker::state::{Outcome, State};
use crate::breaker::window::RollingWindow;
use crate::config::validation::validate_config;
use crate::config::BreakerConfig;
use crate::errors::{BreakerError, ConfigError};
use crate::observability::metrics;

/// A circuit breaker guarding one downstream dependency.
///
/// Construct once, share via `Arc`, and wrap every call to the dependency in
/// [`execute`](Breaker::execute). The wrapped operation must not call back
/// into the same breaker; doing so is undefined.
#[derive(Debug)]
pub struct Breaker {
    /// Name used in logs and metrics labels.
    name: String,
    threshold: f64,
    open_duration: Duration,
    /// Requests that must be observed before a closed breaker may trip.
    min_samples: u64,
    window_seconds: u64,
    inner: RwLock<Inner>,
}

#[derive(Debug)]
struct Inner {
    state: State,
    window: RollingWindow,
    half_open: HalfOpenController,
    last_state_change_at: Instant,
    /// Request rate snapshotted at the most recent trip. `None` until the
    /// breaker has opened at least once.
    baseline_rps: Option<f64>,
    trip_count: u64,
}

impl Breaker {
    /// Build a breaker from a validated configuration.
    pub fn new(name: impl Into<String>, config: BreakerConfig) -> Result<Self, ConfigError> {
        validate_config(&config)?;

        let name = name.into();
        let now = Instant::now();

        tracing::info!(
            breaker = %name,
            window_seconds = config.window_seconds,
            buckets_per_second = config.buckets_per_second,
            threshold = config.threshold,
            open_duration_ms = config.open_duration_ms,
            stages = config.stages.len(),
            "circuit breaker initialized"
        );

        let open_duration = config.open_duration();
        let substage_interval = config.substage_interval();
        let min_samples = config.effective_min_samples();
        let window = RollingWindow::new(config.window_seconds, config.buckets_per_second);
        let half_open = HalfOpenController::new(config.stages, substage_interval, now);

        Ok(Self {
            name,
            threshold: config.threshold,
            open_duration,
            min_samples,
            window_seconds: config.window_seconds,
            inner: RwLock::new(Inner {
                state: State::Closed,
                window,
                half_open,
                last_state_change_at: now,
                baseline_rps: None,
                trip_count: 0,
            }),
        })
    }

    /// Run `op` against the downstream if the breaker admits it.
    ///
    /// On admission the operation runs exactly once, outside the lock, and
    /// its result is returned unchanged (errors wrapped in
    /// [`BreakerError::Downstream`] after being counted). A denied call
    /// returns [`BreakerError::RequestDropped`] without running `op`.
    pub fn execute<T, E, F>(&self, op: F) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        {
            let mut inner = self.inner.write();
            if !self.admit(&mut inner, Instant::now()) {
                tracing::debug!(breaker = %self.name, state = %inner.state, "request dropped");
                metrics::record_rejected(&self.name);
                return Err(BreakerError::RequestDropped);
            }
        }

        // Lock released: the downstream call may block arbitrarily.
        let result = op();

        let outcome = if result.is_err() {
            Outcome::Failure
        } else {
            Outcome::Success
        };

        {
            let mut inner = self.inner.write();
            self.on_outcome(&mut inner, outcome, Instant::now());
        }

        result.map_err(BreakerError::Downstream)
    }

    /// Current state. Cheap shared read.
    pub fn state(&self) -> State {
        self.inner.read().state
    }

    /// Advisory pre-check: would a call arriving now be admitted? The answer
    /// may be stale by the time the caller invokes [`execute`](Breaker::execute).
    pub fn is_allowed(&self) -> bool {
        let inner = self.inner.read();
        match inner.state {
            State::Closed => {
                inner.window.total_requests() < self.min_samples
                    || inner.window.failure_ratio() < self.threshold
            }
            State::Open => {
                Instant::now().saturating_duration_since(inner.last_state_change_at)
                    >= self.open_duration
            }
            State::HalfOpen => inner.half_open.in_flight() < inner.half_open.capacity(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Point-in-time view of breaker internals for the caller's own
    /// dashboards or metrics endpoints.
    pub fn snapshot(&self) -> BreakerSnapshot {
        let inner = self.inner.read();
        BreakerSnapshot {
            name: self.name.clone(),
            state: inner.state,
            total_requests: inner.window.total_requests(),
            total_failures: inner.window.total_failures(),
            failure_ratio: inner.window.failure_ratio(),
            in_flight: match inner.state {
                State::HalfOpen => inner.half_open.in_flight(),
                _ => 0,
            },
            trip_count: inner.trip_count,
            time_in_state_secs: inner.last_state_change_at.elapsed().as_secs(),
        }
    }

    /// Admission decision, with lazy time-driven transitions applied first.
    fn admit(&self, inner: &mut Inner, now: Instant) -> bool {
        // Age the window to `now` so a stale failure ratio cannot pin the
        // breaker shut after the traffic that caused it has scrolled out.
        inner.window.advance(now);

        match inner.state {
            State::Closed => {
                if self.trip_condition(inner) {
                    self.trip(inner, now);
                    return false;
                }
                // Below min_samples the ratio is too noisy to act on.
                inner.window.total_requests() < self.min_samples
                    || inner.window.failure_ratio() < self.threshold
            }
            State::Open => {
                if now.saturating_duration_since(inner.last_state_change_at)
                    >= self.open_duration
                {
                    self.begin_probing(inner, now);
                    inner.half_open.try_admit()
                } else {
                    false
                }
            }
            State::HalfOpen => inner.half_open.try_admit(),
        }
    }

    /// Drive the state machine after a recorded outcome.
    fn on_outcome(&self, inner: &mut Inner, outcome: Outcome, now: Instant) {
        inner.window.record(outcome, now);
        metrics::record_call(&self.name, outcome);

        match inner.state {
            State::Closed => {
                if self.trip_condition(inner) {
                    self.trip(inner, now);
                }
            }
            // A call admitted before the trip settled while open; counted,
            // no transition.
            State::Open => {}
            State::HalfOpen => {
                let ratio = inner.window.failure_ratio();
                let verdict = inner.half_open.record_outcome(now, ratio, self.threshold);
                if outcome.is_failure() && ratio >= self.threshold {
                    self.demote(inner, now);
                } else if verdict == StageVerdict::Promote {
                    self.promote(inner, now);
                }
            }
        }
    }

    /// A ratio exactly at the threshold does not trip; the comparison is
    /// strict.
    fn trip_condition(&self, inner: &Inner) -> bool {
        inner.window.total_requests() >= self.min_samples
            && inner.window.failure_ratio() > self.threshold
    }

    fn trip(&self, inner: &mut Inner, now: Instant) {
        let baseline = inner.window.total_requests() as f64 / self.window_seconds as f64;
        inner.baseline_rps = Some(baseline);
        inner.trip_count += 1;
        tracing::warn!(
            breaker = %self.name,
            failure_ratio = inner.window.failure_ratio(),
            requests = inner.window.total_requests(),
            baseline_rps = baseline,
            "failure ratio over threshold, tripping CLOSED -> OPEN"
        );
        self.transition(inner, State::Open, now);
    }

    fn begin_probing(&self, inner: &mut Inner, now: Instant) {
        inner.window.reset();
        let baseline = inner.baseline_rps.unwrap_or(1.0);
        inner.half_open.enter(now, baseline);
        tracing::info!(
            breaker = %self.name,
            baseline_rps = baseline,
            "cooling period over, probing OPEN -> HALF_OPEN"
        );
        self.transition(inner, State::HalfOpen, now);
    }

    fn promote(&self, inner: &mut Inner, now: Instant) {
        inner.window.reset();
        tracing::info!(
            breaker = %self.name,
            "all probe stages passed, promoting HALF_OPEN -> CLOSED"
        );
        self.transition(inner, State::Closed, now);
    }

    // Keeps the baseline from the previous trip; the aborted probe window
    // is not a better estimate.
    fn demote(&self, inner: &mut Inner, now: Instant) {
        inner.trip_count += 1;
        tracing::warn!(
            breaker = %self.name,
            failure_ratio = inner.window.failure_ratio(),
            stage = inner.half_open.stage_index(),
            "probe failures over threshold, demoting HALF_OPEN -> OPEN"
        );
        self.transition(inner, State::Open, now);
    }

    fn transition(&self, inner: &mut Inner, to: State, now: Instant) {
        let from = inner.state;
        inner.state = to;
        inner.last_state_change_at = now;
        metrics::record_transition(&self.name, from, to);
    }
}

/// A serializable snapshot of breaker state.
#[derive(Debug, Clone, Serialize)]
pub struct BreakerSnapshot {
    pub name: String,
    pub state: State,
    pub total_requests: u64,
    pub total_failures: u64,
    pub failure_ratio: f64,
    /// Probe calls admitted but not yet settled (half-open only).
    pub in_flight: u64,
    /// Times the breaker has opened, including demotions from half-open.
    pub trip_count: u64,
    pub time_in_state_secs: u64,
}
