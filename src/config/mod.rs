//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! caller's config file or literals
//!     → schema.rs (serde records with defaults)
//!     → validation.rs (semantic checks)
//!     → Breaker::new (rejected with ConfigError on violation)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once a breaker is built; retuning means rebuilding
//! - All fields have defaults so a minimal config works out of the box
//! - Validation separates syntactic (serde) from semantic checks

pub mod schema;
pub mod validation;

pub use schema::BreakerConfig;
