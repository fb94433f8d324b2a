//! Graduated admission during recovery probing.
//!
//! # Responsibilities
//! - Decide what fraction of arriving calls to admit while half-open
//! - Walk through the configured admission stages as evidence accumulates
//! - Track calls admitted but not yet recorded
//!
//! # Design Decisions
//! - Stage capacity is a fraction of the request rate seen before the trip,
//!   so a busy dependency is re-warmed proportionally, not all at once
//! - Advancement needs both elapsed time and an acceptable failure ratio;
//!   a single fast success never skips ahead
//! - Demotion back to open is the breaker's call; the controller only
//!   reports whether the ladder has been climbed

use std::time::{Duration, Instant};

/// Whether an outcome moved the controller past the last stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StageVerdict {
    /// Stay half-open, possibly one stage further along.
    Hold,
    /// Every stage passed: the breaker should close.
    Promote,
}

/// Admission ladder used while the breaker is half-open.
///
/// All methods are invoked under the owning breaker's lock.
#[derive(Debug)]
pub(crate) struct HalfOpenController {
    /// Admission fractions in (0, 1], strictly increasing.
    stages: Vec<f64>,
    stage_index: usize,
    /// Minimum elapsed time between stage advancements.
    substage_interval: Duration,
    last_stage_change_at: Instant,
    /// Calls admitted but not yet recorded.
    in_flight: u64,
    /// Request rate observed just before the breaker opened.
    baseline_rps: f64,
}

impl HalfOpenController {
    pub(crate) fn new(stages: Vec<f64>, substage_interval: Duration, now: Instant) -> Self {
        Self {
            stages,
            stage_index: 0,
            substage_interval,
            last_stage_change_at: now,
            in_flight: 0,
            baseline_rps: 1.0,
        }
    }

    /// Re-arm the ladder at stage zero. Called on every entry into half-open.
    pub(crate) fn enter(&mut self, now: Instant, baseline_rps: f64) {
        self.stage_index = 0;
        self.in_flight = 0;
        self.last_stage_change_at = now;
        self.baseline_rps = baseline_rps;
    }

    /// Concurrent calls the current stage allows. Never below one, so even a
    /// near-idle dependency gets probed.
    pub(crate) fn capacity(&self) -> u64 {
        let index = self.stage_index.min(self.stages.len() - 1);
        let allowed = (self.baseline_rps * self.stages[index]).ceil() as u64;
        allowed.max(1)
    }

    /// Admit one call if the current stage has room, counting it in flight.
    pub(crate) fn try_admit(&mut self) -> bool {
        if self.in_flight < self.capacity() {
            self.in_flight += 1;
            true
        } else {
            false
        }
    }

    /// Settle one admitted call and, when both the interval has elapsed and
    /// the observed ratio is acceptable, climb one stage.
    pub(crate) fn record_outcome(
        &mut self,
        now: Instant,
        recent_failure_ratio: f64,
        threshold: f64,
    ) -> StageVerdict {
        self.in_flight = self.in_flight.saturating_sub(1);

        if now.saturating_duration_since(self.last_stage_change_at) >= self.substage_interval
            && recent_failure_ratio < threshold
        {
            self.stage_index += 1;
            self.last_stage_change_at = now;
            if self.stage_index >= self.stages.len() {
                return StageVerdict::Promote;
            }
        }

        StageVerdict::Hold
    }

    pub(crate) fn in_flight(&self) -> u64 {
        self.in_flight
    }

    pub(crate) fn stage_index(&self) -> usize {
        self.stage_index
    }
}
