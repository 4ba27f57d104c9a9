//! Navigation state machine.
//!
//! # States
//! ```text
//! Idle ──request──▶ Resolving ──match──▶ Resolved ──request──▶ Resolving ...
//!                       │
//!                       └──no match──▶ Failed ──(not-found emitted)──▶ Idle
//! ```
//!
//! # Design Decisions
//! - Every request bumps the sequence number; completing a ticket whose
//!   number is no longer the latest is a silent discard (last request wins)
//! - `Pop` and `Initial` navigations never write history, `Push` adds an
//!   entry unless the href is already current, `Replace` overwrites
//! - Not-found still reconciles the URL so the address bar shows what the
//!   user asked for

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::navigation::base::{self, BasePath};
use crate::navigation::history::History;
use crate::navigation::render::{RenderEvent, RenderSink, ViewBinding};
use crate::observability::metrics;
use crate::routing::{match_location, MatchResult, RouteId, RouteRecord, RouteTable};

/// Controller phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Resolving,
    Resolved,
    Failed,
}

/// What caused a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationTrigger {
    /// First resolution of whatever the host is showing at startup.
    Initial,
    /// User link or programmatic push.
    Push,
    /// Programmatic replace.
    Replace,
    /// Browser back/forward replay.
    Pop,
}

impl NavigationTrigger {
    fn writes_history(self) -> bool {
        matches!(self, NavigationTrigger::Push | NavigationTrigger::Replace)
    }
}

/// Snapshot of the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    pub phase: Phase,
    /// Router-relative location of the last completed navigation.
    pub location: String,
    /// Resolved chain, root first. Empty before the first match and after
    /// a not-found.
    pub chain: Vec<RouteId>,
    /// Sequence number of the latest request.
    pub seq: u64,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            location: String::new(),
            chain: Vec::new(),
            seq: 0,
        }
    }
}

/// An in-flight navigation returned by `begin`.
#[derive(Debug)]
#[must_use = "a pending navigation does nothing until completed"]
pub struct PendingNavigation {
    seq: u64,
    trigger: NavigationTrigger,
    location: String,
    result: MatchResult,
}

impl PendingNavigation {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn trigger(&self) -> NavigationTrigger {
        self.trigger
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn result(&self) -> &MatchResult {
        &self.result
    }
}

/// Result of completing a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Resolved { location: String, leaf: RouteId },
    NotFound { location: String },
    /// Superseded by a newer request; nothing was rendered.
    Discarded { seq: u64, latest: u64 },
}

/// Programmatic navigation errors. Not-found is an outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("no route named '{0}'")]
    UnknownRouteName(String),

    #[error("route '{0}' has parameter segments and cannot be navigated to by name")]
    ParametrizedRoute(String),
}

/// Mediates between host history events and resolved view chains.
pub struct NavigationController<V> {
    table: Arc<RouteTable<V>>,
    base: BasePath,
    history: Box<dyn History>,
    sink: Box<dyn RenderSink<V>>,
    state: NavigationState,
}

impl<V: Clone> NavigationController<V> {
    pub fn new(
        table: Arc<RouteTable<V>>,
        base: BasePath,
        history: Box<dyn History>,
        sink: Box<dyn RenderSink<V>>,
    ) -> Self {
        Self {
            table,
            base,
            history,
            sink,
            state: NavigationState::default(),
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn table(&self) -> &Arc<RouteTable<V>> {
        &self.table
    }

    pub fn base(&self) -> &BasePath {
        &self.base
    }

    /// Records of the current chain, root first.
    pub fn current_chain(&self) -> Vec<&RouteRecord<V>> {
        self.state.chain.iter().filter_map(|id| self.table.get(*id)).collect()
    }

    /// Start a navigation and return its ticket.
    ///
    /// `target` is an app location for `Push`/`Replace` and a host href for
    /// `Pop`/`Initial`; either way the base path is stripped before matching.
    pub fn begin(&mut self, target: &str, trigger: NavigationTrigger) -> PendingNavigation {
        let location = match trigger {
            NavigationTrigger::Push | NavigationTrigger::Replace => {
                base::ensure_leading_slash(&self.base.strip(target))
            }
            NavigationTrigger::Pop | NavigationTrigger::Initial => {
                self.table.mode().route_location(target, &self.base)
            }
        };

        self.state.seq += 1;
        self.state.phase = Phase::Resolving;
        tracing::debug!(location = %location, seq = self.state.seq, trigger = ?trigger, "Resolving navigation");

        let result = match_location(&self.table, &location);
        PendingNavigation {
            seq: self.state.seq,
            trigger,
            location,
            result,
        }
    }

    /// Finish a navigation, unless a newer one has started since.
    pub fn complete(&mut self, pending: PendingNavigation) -> NavigationOutcome {
        let latest = self.state.seq;
        if pending.seq != latest {
            tracing::debug!(
                location = %pending.location,
                seq = pending.seq,
                latest,
                "Discarding superseded navigation"
            );
            metrics::record_navigation("discarded");
            return NavigationOutcome::Discarded {
                seq: pending.seq,
                latest,
            };
        }

        let PendingNavigation {
            trigger,
            location,
            result,
            ..
        } = pending;

        if trigger.writes_history() {
            self.reconcile_url(trigger, &location);
        }

        match result {
            MatchResult::Matched(matched) => {
                let chain = ViewBinding::chain(&self.table, &matched);
                let leaf = matched.leaf();

                self.state.phase = Phase::Resolved;
                self.state.location = location.clone();
                self.state.chain = matched.ids();

                tracing::info!(location = %location, depth = chain.len(), "Navigation resolved");
                metrics::record_navigation("resolved");
                self.sink.render(RenderEvent::Resolved {
                    location: location.clone(),
                    chain,
                });

                NavigationOutcome::Resolved { location, leaf }
            }
            MatchResult::NoMatch => {
                self.state.phase = Phase::Failed;
                self.state.location = location.clone();
                self.state.chain.clear();

                tracing::warn!(location = %location, "No route matches location");
                metrics::record_navigation("not_found");
                self.sink.render(RenderEvent::NotFound {
                    location: location.clone(),
                });

                self.state.phase = Phase::Idle;
                NavigationOutcome::NotFound { location }
            }
        }
    }

    /// `begin` followed by `complete`.
    pub fn navigate(&mut self, target: &str, trigger: NavigationTrigger) -> NavigationOutcome {
        let pending = self.begin(target, trigger);
        self.complete(pending)
    }

    /// Resolve whatever the host history currently shows.
    pub fn start(&mut self) -> NavigationOutcome {
        let href = self.history.current();
        self.navigate(&href, NavigationTrigger::Initial)
    }

    pub fn push(&mut self, target: &str) -> NavigationOutcome {
        self.navigate(target, NavigationTrigger::Push)
    }

    pub fn replace(&mut self, target: &str) -> NavigationOutcome {
        self.navigate(target, NavigationTrigger::Replace)
    }

    /// Push the static route registered under `name`.
    pub fn push_named(&mut self, name: &str) -> Result<NavigationOutcome, NavigationError> {
        if self.table.by_name(name).is_none() {
            return Err(NavigationError::UnknownRouteName(name.to_string()));
        }
        let path = self
            .table
            .path_for_name(name)
            .ok_or_else(|| NavigationError::ParametrizedRoute(name.to_string()))?;
        Ok(self.push(&path))
    }

    /// The host reported a back/forward move to `href`.
    pub fn handle_pop(&mut self, href: &str) -> NavigationOutcome {
        self.navigate(href, NavigationTrigger::Pop)
    }

    fn reconcile_url(&mut self, trigger: NavigationTrigger, location: &str) {
        let Some(href) = self.table.mode().href(location, &self.base) else {
            return;
        };

        if trigger == NavigationTrigger::Push && self.history.current() != href {
            tracing::debug!(href = %href, "History push");
            self.history.push(&href);
        } else {
            tracing::debug!(href = %href, "History replace");
            self.history.replace(&href);
        }
    }
}
