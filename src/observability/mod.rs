//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing / navigation / config produce:
//!     → tracing events (logging.rs installs the subscriber)
//!     → metrics.rs (counters)
//! ```
//!
//! # Design Decisions
//! - Structured fields (location, seq, trigger) rather than formatted text
//! - Metrics are cheap counter increments; no exporter is bundled

pub mod logging;
pub mod metrics;
