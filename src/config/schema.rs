//! Configuration schema definitions.
//!
//! All types derive Serde traits so callers can embed them in their own
//! config files. Loading and environment handling stay on the caller's side;
//! this crate only defines the records and their semantic validation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables for one [`Breaker`](crate::Breaker).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BreakerConfig {
    /// Total breadth of the rolling window in seconds.
    pub window_seconds: u64,

    /// Number of buckets each second of the window is divided into.
    pub buckets_per_second: u64,

    /// Failure ratio at which a closed breaker trips open. Must lie strictly
    /// between 0.0 and 1.0.
    pub threshold: f64,

    /// Minimum time spent open before a recovery probe is allowed, in
    /// milliseconds.
    pub open_duration_ms: u64,

    /// Minimum time between half-open stage advancements, in milliseconds.
    pub substage_interval_ms: u64,

    /// Admission fractions walked through while half-open. Strictly
    /// increasing, each in (0, 1].
    pub stages: Vec<f64>,

    /// Minimum observed requests before a closed breaker may trip. Defaults
    /// to the bucket count, capped at 10, so a single early failure cannot
    /// open the breaker.
    pub min_samples: Option<u64>,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            window_seconds: 10,
            buckets_per_second: 1,
            threshold: 0.5,
            open_duration_ms: 2_000,
            substage_interval_ms: 1_000,
            stages: default_stages(),
            min_samples: None,
        }
    }
}

fn default_stages() -> Vec<f64> {
    vec![0.10, 0.30, 0.50, 0.75, 1.00]
}

impl BreakerConfig {
    pub fn open_duration(&self) -> Duration {
        Duration::from_millis(self.open_duration_ms)
    }

    pub fn substage_interval(&self) -> Duration {
        Duration::from_millis(self.substage_interval_ms)
    }

    /// The trip guard actually applied: the configured value, or
    /// `min(10, window_seconds * buckets_per_second)` when unset.
    pub fn effective_min_samples(&self) -> u64 {
        self.min_samples
            .unwrap_or_else(|| 10.min(self.window_seconds.saturating_mul(self.buckets_per_second)))
    }
}
