//! Route matching logic.
//!
//! # Responsibilities
//! - Normalize the incoming location into segments
//! - Walk the route tree in declaration order with a segment cursor
//! - Return the root-to-leaf chain of the first full match, or `NoMatch`
//!
//! # Design Decisions
//! - Children are tried before the parent's own full match (depth first), so
//!   an empty-path child claims its parent's location
//! - First full consumption wins; declaration order breaks ties
//! - Relative patterns consume from the cursor, absolute patterns are checked
//!   from the start of the input and move the cursor to their end
//! - Pure function of (table, location); no allocation beyond the result

use std::ops::Range;

use serde::Serialize;

use crate::routing::path::{self, PathPattern};
use crate::routing::table::{RouteId, RouteRecord, RouteTable};

/// One element of a matching chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedRoute {
    /// The matched record.
    pub id: RouteId,

    /// Input segments this record consumed.
    pub span: Range<usize>,
}

/// A successful match: non-empty chain, root first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMatch {
    chain: Vec<MatchedRoute>,
    segments: Vec<String>,
}

impl RouteMatch {
    pub fn chain(&self) -> &[MatchedRoute] {
        &self.chain
    }

    /// Record ids of the chain, root first.
    pub fn ids(&self) -> Vec<RouteId> {
        self.chain.iter().map(|m| m.id).collect()
    }

    pub fn root(&self) -> RouteId {
        self.chain[0].id
    }

    pub fn leaf(&self) -> RouteId {
        self.chain[self.chain.len() - 1].id
    }

    /// Normalized segments of the matched location.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segments consumed by a single chain element.
    pub fn consumed(&self, matched: &MatchedRoute) -> &[String] {
        &self.segments[matched.span.clone()]
    }
}

/// Outcome of matching a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Matched(RouteMatch),
    NoMatch,
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched(_))
    }

    pub fn as_match(&self) -> Option<&RouteMatch> {
        match self {
            MatchResult::Matched(m) => Some(m),
            MatchResult::NoMatch => None,
        }
    }

    pub fn into_match(self) -> Option<RouteMatch> {
        match self {
            MatchResult::Matched(m) => Some(m),
            MatchResult::NoMatch => None,
        }
    }
}

/// Match a router-relative location against the table.
pub fn match_location<V>(table: &RouteTable<V>, location: &str) -> MatchResult {
    let segments = path::normalize(location);
    let mut chain = Vec::new();

    if walk(table, table.roots(), &segments, 0, &mut chain) {
        MatchResult::Matched(RouteMatch { chain, segments })
    } else {
        MatchResult::NoMatch
    }
}

fn walk<V>(
    table: &RouteTable<V>,
    candidates: &[RouteId],
    input: &[String],
    cursor: usize,
    chain: &mut Vec<MatchedRoute>,
) -> bool {
    for &id in candidates {
        let record = table.record(id);
        let Some(end) = consume_record(record, input, cursor) else {
            continue;
        };

        chain.push(MatchedRoute { id, span: cursor..end });
        if walk(table, record.children(), input, end, chain) || end == input.len() {
            return true;
        }
        chain.pop();
    }
    false
}

fn consume_record<V>(record: &RouteRecord<V>, input: &[String], cursor: usize) -> Option<usize> {
    match record.pattern() {
        PathPattern::Relative(segments) => path::consume(segments, input, cursor),
        PathPattern::Absolute(segments) => path::consume(segments, input, 0).filter(|end| *end >= cursor),
    }
}
