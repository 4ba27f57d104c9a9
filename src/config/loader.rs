//! Configuration loading from disk.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::navigation::{History, NavigationController, RenderSink};
use crate::routing::{ConfigError, RouteTable};

/// Environment variable that overrides the configured base path.
pub const BASE_URL_ENV: &str = "BASE_URL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", ValidationList(.0))]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Table(#[from] ConfigError),
}

struct ValidationList<'a>(&'a [ValidationError]);

impl fmt::Display for ValidationList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

/// A validated config together with the table it describes.
#[derive(Debug)]
pub struct LoadedRouter {
    pub config: RouterConfig,
    pub table: Arc<RouteTable<String>>,
}

impl LoadedRouter {
    /// Wire a navigation controller around this table.
    pub fn controller(
        &self,
        history: Box<dyn History>,
        sink: Box<dyn RenderSink<String>>,
    ) -> NavigationController<String> {
        NavigationController::new(self.table.clone(), self.config.base_path(), history, sink)
    }
}

/// Load, validate and build the router described by a TOML file.
///
/// `BASE_URL`, when set, replaces the configured base path.
pub fn load_config(path: &Path) -> Result<LoadedRouter, LoadError> {
    let content = fs::read_to_string(path)?;
    let mut config: RouterConfig = toml::from_str(&content)?;
    apply_base_override(&mut config, std::env::var(BASE_URL_ENV).ok());

    let loaded = finish(config)?;
    tracing::info!(
        path = %path.display(),
        base = %loaded.config.base,
        mode = ?loaded.config.mode,
        routes = loaded.table.len(),
        "Configuration loaded"
    );
    Ok(loaded)
}

/// Parse and validate config text without touching the environment.
pub fn parse_config(content: &str) -> Result<LoadedRouter, LoadError> {
    let config: RouterConfig = toml::from_str(content)?;
    finish(config)
}

/// Replace the base path when an override is present and non-empty.
pub fn apply_base_override(config: &mut RouterConfig, base: Option<String>) {
    if let Some(base) = base.filter(|b| !b.trim().is_empty()) {
        tracing::debug!(from = %config.base, to = %base, "Base path overridden by environment");
        config.base = base;
    }
}

fn finish(config: RouterConfig) -> Result<LoadedRouter, LoadError> {
    validate_config(&config).map_err(LoadError::Validation)?;
    let table = config.build_table()?;

    Ok(LoadedRouter {
        config,
        table: Arc::new(table),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::HistoryMode;
    use crate::routing::{match_location, ConfigIssue};
    use std::io::Write;

    const SAMPLE: &str = include_str!("../../router.toml");

    #[test]
    fn test_parse_sample_config() {
        let loaded = parse_config(SAMPLE).unwrap();

        assert_eq!(loaded.config.mode, HistoryMode::History);
        assert_eq!(loaded.table.len(), 4);
        assert_eq!(loaded.table.path_for_name("home").as_deref(), Some("/"));
        assert!(match_location(&loaded.table, "/extremum").is_match());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let loaded = load_config(file.path()).unwrap();
        assert_eq!(loaded.table.roots().len(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("routes = 3").unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn test_table_errors_surface() {
        let err = parse_config(
            r#"
            [[routes]]
            path = "/"
            name = "home"
            component = "Main"

            [[routes]]
            path = "/other"
            name = "home"
            component = "Other"
            "#,
        )
        .unwrap_err();

        match err {
            LoadError::Table(table) => {
                assert!(matches!(table.issues[0], ConfigIssue::DuplicateName { .. }));
            }
            other => panic!("expected table error, got {other}"),
        }
    }

    #[test]
    fn test_validation_errors_listed() {
        let err = parse_config(
            r#"
            base = "app"

            [observability]
            log_level = "loud"
            "#,
        )
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Validation failed: base path 'app' must start with '/', unknown log level 'loud'"
        );
    }

    #[test]
    fn test_base_override() {
        let mut config = RouterConfig::default();

        apply_base_override(&mut config, Some("   ".into()));
        assert_eq!(config.base, "/");

        apply_base_override(&mut config, Some("/app/".into()));
        assert_eq!(config.base_path().as_str(), "/app");
    }
}
