//! Deployment base path handling.
//!
//! An app mounted under `/app` sees `/app/animals` in the address bar and
//! `/animals` in its route table. A location that does not start with the
//! base is treated as already router-relative and passes through unchanged.

use crate::routing::path;

/// Strip `base` from the front of `location`.
///
/// The prefix must end on a segment boundary, so `/application` is not
/// under `/app`. Returns the location unchanged when the prefix is absent.
pub fn strip(location: &str, base: &str) -> String {
    BasePath::new(base).strip(location)
}

/// Prepend `base` to a router-relative location.
pub fn qualify(relative: &str, base: &str) -> String {
    BasePath::new(base).qualify(relative)
}

/// A normalized base path: empty for "no base", otherwise `/seg/...` with no
/// trailing slash.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasePath(String);

impl BasePath {
    pub fn new(raw: &str) -> Self {
        let segments = path::normalize(raw);
        if segments.is_empty() {
            Self(String::new())
        } else {
            Self(path::join(&segments))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Without a base, or when the base does not prefix `location`, the
    /// input comes back as given.
    pub fn strip(&self, location: &str) -> String {
        if self.is_root() {
            return location.to_string();
        }

        match location.strip_prefix(self.0.as_str()) {
            Some("") => "/".to_string(),
            Some(rest) if rest.starts_with('/') => rest.to_string(),
            Some(rest) if rest.starts_with(['?', '#']) => format!("/{}", rest),
            _ => location.to_string(),
        }
    }

    pub fn qualify(&self, relative: &str) -> String {
        let relative = ensure_leading_slash(relative);
        format!("{}{}", self.0, relative)
    }
}

pub(crate) fn ensure_leading_slash(location: &str) -> String {
    if location.starts_with('/') {
        location.to_string()
    } else {
        format!("/{}", location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip() {
        assert_eq!(strip("/app/animals", "/app"), "/animals");
        assert_eq!(strip("/other", "/app"), "/other");
        assert_eq!(strip("/app", "/app"), "/");
        assert_eq!(strip("/app/", "/app/"), "/");
        assert_eq!(strip("/app?x=1", "/app"), "/?x=1");
        assert_eq!(strip("/application", "/app"), "/application");
        assert_eq!(strip("/animals", "/"), "/animals");
    }

    #[test]
    fn test_strip_leaves_unmatched_input_untouched() {
        assert_eq!(strip("other", "/app"), "other");
        assert_eq!(strip("app/animals", "/app"), "app/animals");
        assert_eq!(strip("animals", ""), "animals");
    }

    #[test]
    fn test_qualify() {
        assert_eq!(qualify("/animals", "/app"), "/app/animals");
        assert_eq!(qualify("/", "/app/"), "/app/");
        assert_eq!(qualify("animals", ""), "/animals");
        assert_eq!(qualify("/", "/"), "/");
    }

    #[test]
    fn test_base_normalization() {
        assert_eq!(BasePath::new("/app/"), BasePath::new("app"));
        assert_eq!(BasePath::new("/app//v2/").as_str(), "/app/v2");
        assert!(BasePath::new("").is_root());
        assert!(BasePath::new("/").is_root());
    }

    #[test]
    fn test_strip_inverts_qualify() {
        let base = BasePath::new("/app");
        for location in ["/", "/animals", "/extremum?x=1"] {
            assert_eq!(base.strip(&base.qualify(location)), location);
        }
    }
}
