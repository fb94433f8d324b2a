//! Rolling request/failure window.
//!
//! # Responsibilities
//! - Maintain a fixed ring of per-time-slice counters
//! - Keep running totals in sync with the ring contents
//! - Age out stale slices as the clock advances
//!
//! # Design Decisions
//! - Running totals instead of re-summing on every ratio query
//! - Rotation is amortized O(1), driven by the caller's clock reading
//! - An idle gap longer than the whole window clears everything at once

use std::time::{Duration, Instant};

use super::state::Outcome;

/// One time slice of the window: how many requests it saw and how many failed.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Bucket {
    requests: u64,
    failures: u64,
}

/// Fixed-capacity ring of [`Bucket`]s covering the most recent
/// `window_seconds` of traffic.
///
/// All mutation happens under the owning breaker's lock; the window itself
/// carries no synchronization.
#[derive(Debug)]
pub(crate) struct RollingWindow {
    buckets: Vec<Bucket>,
    head_index: usize,
    /// Instant the head bucket began accumulating. `None` until the first
    /// record after construction or reset.
    head_started_at: Option<Instant>,
    bucket_duration: Duration,
    total_requests: u64,
    total_failures: u64,
}

impl RollingWindow {
    /// Build a window of `window_seconds * buckets_per_second` buckets.
    /// Geometry is validated at config level; both inputs are >= 1 here.
    pub(crate) fn new(window_seconds: u64, buckets_per_second: u64) -> Self {
        let len = (window_seconds * buckets_per_second) as usize;
        Self {
            buckets: vec![Bucket::default(); len],
            head_index: 0,
            head_started_at: None,
            bucket_duration: Duration::from_secs(1) / buckets_per_second as u32,
            total_requests: 0,
            total_failures: 0,
        }
    }

    /// Rotate the ring forward to cover `now`. Idempotent: does nothing if
    /// the head bucket is still current.
    pub(crate) fn advance(&mut self, now: Instant) {
        let Some(started) = self.head_started_at else {
            self.head_started_at = Some(now);
            return;
        };

        let elapsed = now.saturating_duration_since(started);
        if elapsed < self.bucket_duration {
            return;
        }

        let steps = (elapsed.as_nanos() / self.bucket_duration.as_nanos()) as u64;

        // Idle for at least the whole window: nothing in the ring is still
        // relevant, so clear it in one pass and re-anchor at `now`.
        if steps >= self.buckets.len() as u64 {
            self.reset();
            self.head_started_at = Some(now);
            return;
        }

        let mut head_started_at = started;
        for _ in 0..steps {
            self.head_index = (self.head_index + 1) % self.buckets.len();
            let evicted = self.buckets[self.head_index];
            debug_assert!(self.total_requests >= evicted.requests);
            debug_assert!(self.total_failures >= evicted.failures);
            self.total_requests -= evicted.requests;
            self.total_failures -= evicted.failures;
            self.buckets[self.head_index] = Bucket::default();
            head_started_at += self.bucket_duration;
        }
        self.head_started_at = Some(head_started_at);
    }

    /// Count one call outcome in the bucket covering `now`.
    pub(crate) fn record(&mut self, outcome: Outcome, now: Instant) {
        self.advance(now);
        self.buckets[self.head_index].requests += 1;
        self.total_requests += 1;
        if outcome.is_failure() {
            self.buckets[self.head_index].failures += 1;
            self.total_failures += 1;
        }
    }

    /// Failure ratio over the window, in [0, 1]. Zero when empty.
    pub(crate) fn failure_ratio(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.total_failures as f64 / self.total_requests as f64
        }
    }

    pub(crate) fn total_requests(&self) -> u64 {
        self.total_requests
    }

    pub(crate) fn total_failures(&self) -> u64 {
        self.total_failures
    }

    /// Zero every bucket and both totals. The head timestamp stays unset
    /// until the next record re-anchors it.
    pub(crate) fn reset(&mut self) {
        for bucket in &mut self.buckets {
            *bucket = Bucket::default();
        }
        self.head_index = 0;
        self.head_started_at = None;
        self.total_requests = 0;
        self.total_failures = 0;
    }
}
