//! Shared helpers for breaker integration tests.

use std::sync::Once;

use breakwater::{Breaker, BreakerConfig, BreakerError};
use thiserror::Error;

static INIT: Once = Once::new();

/// Route breaker logs through the test harness. `RUST_LOG=debug cargo test`
/// shows transition traces.
pub fn init_tracing() {
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "breakwater=info".into()),
            )
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();
    });
}

/// The downstream error used by the scenario tests.
#[derive(Debug, Error, PartialEq)]
#[error("backend unavailable")]
pub struct BackendDown;

/// Scenario geometry: 10 s window at one bucket per second, 0.5 threshold,
/// durations scaled to milliseconds so tests stay fast.
pub fn scenario_config() -> BreakerConfig {
    BreakerConfig {
        window_seconds: 10,
        buckets_per_second: 1,
        threshold: 0.5,
        open_duration_ms: 100,
        substage_interval_ms: 60,
        ..Default::default()
    }
}

pub fn succeed(breaker: &Breaker) -> Result<u32, BreakerError<BackendDown>> {
    breaker.execute(|| Ok(1))
}

#[allow(dead_code)]
pub fn fail(breaker: &Breaker) -> Result<u32, BreakerError<BackendDown>> {
    breaker.execute(|| Err(BackendDown))
}
