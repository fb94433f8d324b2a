//! Retry policy records.
//!
//! The breaker itself never retries: a dropped call and a failed call are
//! both terminal results of `execute`. Callers that want retries pair a
//! breaker with a [`RetryPolicy`] and loop on their side, so retried
//! attempts are still individually admitted and counted.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Retry schedule a caller may wrap around breaker-guarded calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 100,
            max_delay_ms: 2_000,
        }
    }
}

impl RetryPolicy {
    /// Delay to sleep before the given attempt (1-based; attempt 0 and the
    /// first attempt are immediate). Exponential with up to 10% jitter.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }

        let exponent = 2u64.saturating_pow(attempt - 2);
        let delay_ms = self.base_delay_ms.saturating_mul(exponent).min(self.max_delay_ms);

        let jitter_range = delay_ms / 10;
        let jitter = if jitter_range > 0 {
            rand::thread_rng().gen_range(0..jitter_range)
        } else {
            0
        };

        Duration::from_millis(delay_ms + jitter)
    }

    /// True if another attempt is within budget.
    pub fn allows(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}
