//! Path normalization and segment patterns.
//!
//! # Responsibilities
//! - Split raw locations into canonical segments
//! - Parse declared route paths into `PathPattern`s
//! - Consume patterns against the segments of an incoming location
//!
//! # Design Decisions
//! - Empty segments collapse, so `/a//b/` and `/a/b` are the same location
//! - Query string and fragment never take part in matching
//! - Static segments compare by exact string equality (case-sensitive)
//! - `:name` segments match any single segment; the value is not extracted

use std::fmt;

use thiserror::Error;

/// Drop the query string and fragment from a location.
pub fn path_only(location: &str) -> &str {
    let end = location.find(['?', '#']).unwrap_or(location.len());
    &location[..end]
}

/// Split a location into its normalized segments.
pub fn normalize(location: &str) -> Vec<String> {
    path_only(location)
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Render segments back into a canonical absolute path (`/` when empty).
pub fn join<S: fmt::Display>(segments: &[S]) -> String {
    if segments.is_empty() {
        return "/".to_string();
    }
    segments.iter().map(|s| format!("/{}", s)).collect()
}

/// Reasons a declared path cannot be turned into a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("parameter segment has no name")]
    EmptyParam,

    #[error("route paths cannot carry a query string or fragment")]
    QueryOrFragment,
}

/// One segment of a declared route path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Static(String),
    Param(String),
}

impl Segment {
    fn parse(raw: &str) -> Result<Self, PatternError> {
        match raw.strip_prefix(':') {
            Some("") => Err(PatternError::EmptyParam),
            Some(name) => Ok(Segment::Param(name.to_string())),
            None => Ok(Segment::Static(raw.to_string())),
        }
    }

    /// Returns true if the input segment satisfies this pattern segment.
    pub fn matches(&self, input: &str) -> bool {
        match self {
            Segment::Static(expected) => expected == input,
            Segment::Param(_) => !input.is_empty(),
        }
    }

    pub fn is_param(&self) -> bool {
        matches!(self, Segment::Param(_))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Static(s) => f.write_str(s),
            Segment::Param(name) => write!(f, ":{}", name),
        }
    }
}

/// A declared route path, resolved once at table build time.
///
/// `Relative` patterns continue from wherever the parent stopped consuming.
/// `Absolute` patterns (declared with a leading `/`) hold the full segment
/// sequence from the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    Relative(Vec<Segment>),
    Absolute(Vec<Segment>),
}

impl PathPattern {
    /// Parse a declared route path.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        if raw.contains(['?', '#']) {
            return Err(PatternError::QueryOrFragment);
        }

        let segments = raw
            .split('/')
            .filter(|s| !s.is_empty())
            .map(Segment::parse)
            .collect::<Result<Vec<_>, _>>()?;

        if raw.starts_with('/') {
            Ok(PathPattern::Absolute(segments))
        } else {
            Ok(PathPattern::Relative(segments))
        }
    }

    pub fn segments(&self) -> &[Segment] {
        match self {
            PathPattern::Relative(segments) | PathPattern::Absolute(segments) => segments,
        }
    }

    pub fn is_absolute(&self) -> bool {
        matches!(self, PathPattern::Absolute(_))
    }
}

/// Try to consume `pattern` against `input` starting at `from`.
///
/// Returns the cursor position after the pattern on success.
pub fn consume(pattern: &[Segment], input: &[String], from: usize) -> Option<usize> {
    let end = from.checked_add(pattern.len())?;
    let window = input.get(from..end)?;

    pattern
        .iter()
        .zip(window)
        .all(|(segment, actual)| segment.matches(actual))
        .then_some(end)
}
