//! Host history integration.
//!
//! # Responsibilities
//! - Define the `History` primitives the controller drives (push/replace)
//! - Map between host hrefs and router-relative locations per `HistoryMode`
//! - Provide an in-memory history for tests and the CLI
//!
//! # Design Decisions
//! - Back/forward notifications are not pulled from `History`; the host
//!   forwards them to the controller (`handle_pop` or the driver)
//! - Absolute hrefs (`https://host/app/x`) are reduced to their path first

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::navigation::base::{ensure_leading_slash, BasePath};

/// How the visible URL carries the route location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    /// `/base/animals`, written with push/replace.
    #[default]
    History,

    /// `/base/#/animals`, route kept in the fragment.
    Hash,

    /// The visible URL is never touched.
    Abstract,
}

impl HistoryMode {
    /// Extract the router-relative location from a host href.
    pub fn route_location(self, href: &str, base: &BasePath) -> String {
        let href = href_path(href);
        match self {
            HistoryMode::History | HistoryMode::Abstract => ensure_leading_slash(&base.strip(&href)),
            HistoryMode::Hash => match href.split_once('#') {
                Some((_, fragment)) if fragment.starts_with('/') => fragment.to_string(),
                Some((_, fragment)) => format!("/{}", fragment),
                None => "/".to_string(),
            },
        }
    }

    /// The href to write to the host for a router-relative location.
    ///
    /// `None` in abstract mode.
    pub fn href(self, location: &str, base: &BasePath) -> Option<String> {
        match self {
            HistoryMode::History => Some(base.qualify(location)),
            HistoryMode::Hash => Some(format!("{}#{}", base.qualify("/"), location)),
            HistoryMode::Abstract => None,
        }
    }
}

/// Reduce an absolute URL to path, query and fragment. Anything that does
/// not parse as an absolute URL is returned as is.
fn href_path(href: &str) -> String {
    match Url::parse(href) {
        Ok(url) if url.has_host() => {
            let mut out = url.path().to_string();
            if let Some(query) = url.query() {
                out.push('?');
                out.push_str(query);
            }
            if let Some(fragment) = url.fragment() {
                out.push('#');
                out.push_str(fragment);
            }
            out
        }
        _ => href.to_string(),
    }
}

/// History primitives of the host environment.
pub trait History: Send {
    /// The href currently shown.
    fn current(&self) -> String;

    /// Add a new history entry.
    fn push(&mut self, href: &str);

    /// Overwrite the current history entry.
    fn replace(&mut self, href: &str);
}

#[derive(Debug)]
struct Stack {
    entries: Vec<String>,
    index: usize,
}

/// In-memory history stack.
///
/// Cloning yields another handle to the same stack, so a test can hand one
/// handle to the controller and inspect the other.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    inner: Arc<Mutex<Stack>>,
}

impl MemoryHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Stack {
                entries: vec![initial.into()],
                index: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Stack> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn entries(&self) -> Vec<String> {
        self.lock().entries.clone()
    }

    pub fn index(&self) -> usize {
        self.lock().index
    }

    /// Move `delta` entries and return the href now shown, like a browser
    /// back/forward. Returns `None` when out of range.
    pub fn go(&self, delta: isize) -> Option<String> {
        let mut stack = self.lock();
        let target = stack.index.checked_add_signed(delta)?;
        let href = stack.entries.get(target)?.clone();
        stack.index = target;
        Some(href)
    }

    pub fn back(&self) -> Option<String> {
        self.go(-1)
    }

    pub fn forward(&self) -> Option<String> {
        self.go(1)
    }
}

impl History for MemoryHistory {
    fn current(&self) -> String {
        let stack = self.lock();
        stack.entries[stack.index].clone()
    }

    fn push(&mut self, href: &str) {
        let mut stack = self.lock();
        let next = stack.index + 1;
        stack.entries.truncate(next);
        stack.entries.push(href.to_string());
        stack.index = next;
    }

    fn replace(&mut self, href: &str) {
        let mut stack = self.lock();
        let index = stack.index;
        stack.entries[index] = href.to_string();
    }
}
