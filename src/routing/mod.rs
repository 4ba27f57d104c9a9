//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Table Construction (at startup):
//!     RouteDecl[] (config or code)
//!     → path.rs (normalize, parse Relative/Absolute patterns)
//!     → table.rs (validate names and paths, precompute full patterns)
//!     → Freeze as immutable RouteTable
//!
//! Per Navigation:
//!     router-relative location
//!     → matcher.rs (cursor walk over the tree)
//!     → Return: root-to-leaf chain or NoMatch
//! ```
//!
//! # Design Decisions
//! - Table built once, immutable at runtime (share via Arc)
//! - Static segments only compare by equality; no regex
//! - Deterministic: same input always yields the same chain
//! - First full match wins (declaration order)

pub mod matcher;
pub mod path;
pub mod table;

pub use matcher::{match_location, MatchResult, MatchedRoute, RouteMatch};
pub use table::{BuildOptions, ConfigError, ConfigIssue, RouteDecl, RouteId, RouteRecord, RouteTable};
