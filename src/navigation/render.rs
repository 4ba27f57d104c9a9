//! Handoff to the rendering collaborator.
//!
//! The controller never mounts views itself. It emits a `RenderEvent` to
//! whatever `RenderSink` the composition root injected: a closure, or a
//! channel drained by the UI layer.

use serde::Serialize;
use tokio::sync::mpsc;

use crate::routing::{RouteMatch, RouteTable};

/// One level of the resolved view tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewBinding<V> {
    pub component: V,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Full declared path of the record, e.g. `/animals`.
    pub path: String,
}

impl<V: Clone> ViewBinding<V> {
    /// Bindings for every element of a match, root first.
    pub fn chain(table: &RouteTable<V>, matched: &RouteMatch) -> Vec<Self> {
        matched
            .chain()
            .iter()
            .map(|m| {
                let record = table.record(m.id);
                ViewBinding {
                    component: record.component().clone(),
                    name: record.name().map(str::to_string),
                    path: record.full_path(),
                }
            })
            .collect()
    }
}

/// What the rendering layer should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RenderEvent<V> {
    /// Mount `chain`, outermost view first.
    Resolved {
        location: String,
        chain: Vec<ViewBinding<V>>,
    },

    /// Nothing matched; show a not-found view for `location`.
    NotFound { location: String },
}

impl<V> RenderEvent<V> {
    pub fn location(&self) -> &str {
        match self {
            RenderEvent::Resolved { location, .. } | RenderEvent::NotFound { location } => location,
        }
    }
}

/// Receiver of render events.
pub trait RenderSink<V>: Send {
    fn render(&mut self, event: RenderEvent<V>);
}

impl<V, F> RenderSink<V> for F
where
    F: FnMut(RenderEvent<V>) + Send,
{
    fn render(&mut self, event: RenderEvent<V>) {
        self(event)
    }
}

/// Sink that forwards events over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink<V> {
    tx: mpsc::UnboundedSender<RenderEvent<V>>,
}

impl<V> ChannelSink<V> {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RenderEvent<V>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl<V: Send> RenderSink<V> for ChannelSink<V> {
    fn render(&mut self, event: RenderEvent<V>) {
        if self.tx.send(event).is_err() {
            tracing::warn!("Render channel closed, dropping render event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{match_location, BuildOptions, RouteDecl};

    #[test]
    fn test_bindings_follow_chain() {
        let table = RouteTable::build(
            vec![RouteDecl::new("/", "Main").with_children(vec![RouteDecl::new("", "Diagnosis").named("home")])],
            BuildOptions::default(),
        )
        .unwrap();
        let matched = match_location(&table, "/").into_match().unwrap();

        let chain = ViewBinding::chain(&table, &matched);
        assert_eq!(
            chain,
            vec![
                ViewBinding { component: "Main", name: None, path: "/".into() },
                ViewBinding { component: "Diagnosis", name: Some("home".into()), path: "/".into() },
            ]
        );
    }

    #[test]
    fn test_render_event_json_shape() {
        let event: RenderEvent<&str> = RenderEvent::NotFound { location: "/x".into() };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json, serde_json::json!({ "event": "not_found", "location": "/x" }));
    }

    #[test]
    fn test_channel_sink_forwards() {
        let (mut sink, mut rx) = ChannelSink::<&str>::new();
        sink.render(RenderEvent::NotFound { location: "/x".into() });

        assert_eq!(rx.try_recv().unwrap().location(), "/x");
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |event: RenderEvent<&str>| seen.push(event.location().to_string());
            sink.render(RenderEvent::NotFound { location: "/y".into() });
        }
        assert_eq!(seen, vec!["/y"]);
    }
}
