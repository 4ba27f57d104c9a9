//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::navigation::{BasePath, HistoryMode};
use crate::routing::{BuildOptions, ConfigError, RouteDecl, RouteTable};

/// Root configuration for the router.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Deployment sub-path the app is mounted under (e.g. "/app/").
    pub base: String,

    /// How the visible URL is kept in sync.
    pub mode: HistoryMode,

    /// Require a route that resolves "/".
    pub require_root: bool,

    /// Route declarations; components are view identifiers.
    pub routes: Vec<RouteDecl<String>>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            base: "/".to_string(),
            mode: HistoryMode::History,
            require_root: true,
            routes: Vec::new(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl RouterConfig {
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            mode: self.mode,
            require_root: self.require_root,
        }
    }

    pub fn base_path(&self) -> BasePath {
        BasePath::new(&self.base)
    }

    /// Build the route table described by this config.
    pub fn build_table(&self) -> Result<RouteTable<String>, ConfigError> {
        RouteTable::build(self.routes.clone(), self.build_options())
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
