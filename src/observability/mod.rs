//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Breaker activity produces:
//!     → tracing events (state transitions, rejections)
//!     → metrics.rs (counters and a state gauge, labelled by breaker name)
//!     → BreakerSnapshot (pull-based view for the caller's own endpoints)
//! ```
//!
//! # Design Decisions
//! - Emission goes through the `metrics` facade; installing a recorder or
//!   exporter is the embedding application's job
//! - Metrics are cheap (counter increments), safe on the admission hot path
//! - No latency histograms; the breaker observes outcomes, not durations

pub mod metrics;
