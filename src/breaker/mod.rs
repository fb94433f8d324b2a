//! Circuit breaker subsystem.
//!
//! # Data Flow
//! ```text
//! execute(op)
//!     → core.rs (admission under the breaker lock)
//!         Closed: window.rs failure ratio vs threshold
//!         Open: cooling period check, then probe
//!         Half-Open: half_open.rs staged capacity
//!     → op() runs outside the lock
//!     → core.rs (outcome recorded, state machine driven)
//!         window.rs (bucket counters, running totals)
//!         half_open.rs (stage ladder, in-flight accounting)
//! ```
//!
//! # Design Decisions
//! - All shared state behind one lock per breaker; no atomics juggling
//! - Measurements flow outcome → bucket → running totals → failure ratio
//! - The half-open ladder re-warms a recovering dependency gradually
//!   instead of releasing the full backlog at once

pub mod core;
pub mod half_open;
pub mod state;
pub mod window;

pub use self::core::{Breaker, BreakerSnapshot};
pub use state::{Outcome, State};
