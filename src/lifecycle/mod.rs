//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → broadcast → history driver / config watch loops exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
