//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! router.toml
//!     → loader.rs (parse & deserialize, BASE_URL override)
//!     → validation.rs (semantic checks)
//!     → RouteTable::build (tree invariants)
//!     → LoadedRouter (config + Arc<RouteTable>)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads and rebuilds
//!     → new LoadedRouter sent to the host; old table untouched
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Base path is read once at startup

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, LoadError, LoadedRouter};
pub use schema::{ObservabilityConfig, RouterConfig};
pub use validation::ValidationError;
