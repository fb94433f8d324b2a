//! Configuration validation logic.
//!
//! Serde handles the syntactic side; the semantic constraints live here and
//! run once at breaker construction.

use crate::config::schema::BreakerConfig;
use crate::errors::ConfigError;

/// Check a [`BreakerConfig`] for semantic correctness. Returns the first
/// violated constraint, named by field.
pub fn validate_config(config: &BreakerConfig) -> Result<(), ConfigError> {
    if config.window_seconds == 0 {
        return Err(ConfigError::new("window_seconds", "must be at least 1"));
    }

    if config.buckets_per_second == 0 {
        return Err(ConfigError::new("buckets_per_second", "must be at least 1"));
    }
    if config.buckets_per_second > 1_000_000_000 {
        return Err(ConfigError::new(
            "buckets_per_second",
            "bucket duration would be below one nanosecond",
        ));
    }

    match config.window_seconds.checked_mul(config.buckets_per_second) {
        None => {
            return Err(ConfigError::new(
                "window_seconds",
                "window_seconds * buckets_per_second overflows",
            ))
        }
        Some(0) => {
            // Unreachable given the checks above, but the constraint is on
            // the product, so state it on its own terms.
            return Err(ConfigError::new(
                "window_seconds",
                "window_seconds * buckets_per_second must be at least 1",
            ));
        }
        Some(_) => {}
    }

    if !(config.threshold > 0.0 && config.threshold < 1.0) {
        return Err(ConfigError::new(
            "threshold",
            format!("must be within (0.0, 1.0), got {}", config.threshold),
        ));
    }

    if config.stages.is_empty() {
        return Err(ConfigError::new("stages", "must not be empty"));
    }
    let mut previous = 0.0;
    for (index, &stage) in config.stages.iter().enumerate() {
        if !(stage > 0.0 && stage <= 1.0) {
            return Err(ConfigError::new(
                "stages",
                format!("stage {index} must be within (0.0, 1.0], got {stage}"),
            ));
        }
        if stage <= previous {
            return Err(ConfigError::new(
                "stages",
                format!("stages must be strictly increasing, stage {index} is {stage}"),
            ));
        }
        previous = stage;
    }

    if config.min_samples == Some(0) {
        return Err(ConfigError::new("min_samples", "must be at least 1"));
    }

    Ok(())
}
