//! Breakwater: a sliding-window circuit breaker with staged half-open
//! recovery.
//!
//! Wrap calls to an unreliable downstream in [`Breaker::execute`]. The
//! breaker watches the failure rate over a rolling time window, fails fast
//! once the dependency looks unhealthy, and after a cooling period
//! reintroduces traffic in graduated stages until recovery is confirmed.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌───────────────────────────────────────────────┐
//!                   │                   BREAKER                      │
//!                   │                                                │
//!   execute(op) ────┼─▶ admission ──▶ state machine ──▶ op() ───────┼──▶ downstream
//!                   │       │      CLOSED/OPEN/HALF_OPEN   │        │
//!                   │       │                              ▼        │
//!                   │       │                       record outcome  │
//!                   │       ▼                              │        │
//!                   │  ┌──────────────┐            ┌──────────────┐ │
//!                   │  │  half_open   │            │   rolling    │ │
//!                   │  │ stage ladder │            │   window     │ │
//!                   │  └──────────────┘            └──────────────┘ │
//!                   │                                                │
//!                   │  Cross-cutting: config validation, tracing,    │
//!                   │  metrics, snapshots                            │
//!                   └───────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use breakwater::{Breaker, BreakerConfig, BreakerError};
//!
//! let breaker = Breaker::new("payments-db", BreakerConfig::default())?;
//!
//! let result: Result<&str, BreakerError<std::io::Error>> =
//!     breaker.execute(|| Ok("row"));
//! assert_eq!(result.unwrap(), "row");
//! # Ok::<(), breakwater::ConfigError>(())
//! ```
//!
//! What counts as a failure is the caller's choice: return `Ok` from the
//! wrapped closure for errors that should not count against the breaker
//! (a 4xx response, say), and `Err` for those that should.

// Core subsystem
pub mod breaker;

// Cross-cutting concerns
pub mod config;
pub mod errors;
pub mod observability;
pub mod retry;

pub use breaker::{Breaker, BreakerSnapshot, Outcome, State};
pub use config::BreakerConfig;
pub use errors::{BreakerError, ConfigError};
pub use retry::RetryPolicy;
