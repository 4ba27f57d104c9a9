//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check values the route table does not own (base path, log level)
//! - Catch declarations with no view to render
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Route tree invariants (names, paths, root) stay in `RouteTable::build`

use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::observability::logging;
use crate::routing::RouteDecl;

/// A semantic problem in a router config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("base path '{0}' must start with '/'")]
    RelativeBase(String),

    #[error("unknown log level '{0}'")]
    InvalidLogLevel(String),

    #[error("route '{path}' has an empty component")]
    EmptyComponent { path: String },
}

/// Validate a config, collecting every problem.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !config.base.is_empty() && !config.base.starts_with('/') {
        errors.push(ValidationError::RelativeBase(config.base.clone()));
    }

    if !logging::is_valid_level(&config.observability.log_level) {
        errors.push(ValidationError::InvalidLogLevel(config.observability.log_level.clone()));
    }

    check_components(&config.routes, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_components(routes: &[RouteDecl<String>], errors: &mut Vec<ValidationError>) {
    for route in routes {
        if route.component.trim().is_empty() {
            errors.push(ValidationError::EmptyComponent {
                path: route.path.clone(),
            });
        }
        check_components(&route.children, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&RouterConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let config = RouterConfig {
            base: "app".into(),
            routes: vec![RouteDecl::new("/", "Main".to_string())
                .with_children(vec![RouteDecl::new("", " ".to_string())])],
            observability: crate::config::ObservabilityConfig {
                log_level: "loud".into(),
            },
            ..RouterConfig::default()
        };

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::RelativeBase("app".into()),
                ValidationError::InvalidLogLevel("loud".into()),
                ValidationError::EmptyComponent { path: "".into() },
            ]
        );
    }
}
