//! Async history event loop.
//!
//! # Responsibilities
//! - Resolve the initial location once subscribed
//! - Feed host history notifications and app navigation requests into the
//!   controller, one at a time
//! - Stop on shutdown signal or when every event sender is gone

use tokio::sync::{broadcast, mpsc};

use crate::navigation::controller::NavigationController;

/// A notification from the host or a navigation request from the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEvent {
    /// App requested a push to a router location.
    Push(String),
    /// App requested a replace with a router location.
    Replace(String),
    /// App requested a push to a named route.
    Named(String),
    /// Host moved back/forward; carries the href now shown.
    Popped(String),
}

/// Owns a controller and drives it from a channel.
pub struct HistoryDriver<V> {
    controller: NavigationController<V>,
}

impl<V: Clone> HistoryDriver<V> {
    pub fn new(controller: NavigationController<V>) -> Self {
        Self { controller }
    }

    /// Run until shutdown or until the event channel closes.
    ///
    /// Returns the controller so the caller can inspect the final state.
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<HistoryEvent>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> NavigationController<V> {
        tracing::info!(base = %self.controller.base().as_str(), "History driver starting");
        self.controller.start();

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.dispatch(event),
                    None => {
                        tracing::debug!("History event channel closed");
                        break;
                    }
                },
                _ = shutdown.recv() => {
                    tracing::info!("History driver received shutdown signal, exiting loop");
                    break;
                }
            }
        }

        self.controller
    }

    fn dispatch(&mut self, event: HistoryEvent) {
        match event {
            HistoryEvent::Push(location) => {
                self.controller.push(&location);
            }
            HistoryEvent::Replace(location) => {
                self.controller.replace(&location);
            }
            HistoryEvent::Named(name) => {
                if let Err(e) = self.controller.push_named(&name) {
                    tracing::warn!(error = %e, "Named navigation rejected");
                }
            }
            HistoryEvent::Popped(href) => {
                self.controller.handle_pop(&href);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::lifecycle::Shutdown;
    use crate::navigation::{BasePath, ChannelSink, MemoryHistory, Phase, RenderEvent};
    use crate::routing::{BuildOptions, RouteDecl, RouteTable};

    fn driver() -> (HistoryDriver<&'static str>, mpsc::UnboundedReceiver<RenderEvent<&'static str>>) {
        let decls = vec![RouteDecl::new("/", "Main").with_children(vec![
            RouteDecl::new("", "Diagnosis").named("home"),
            RouteDecl::new("/animals", "Diagnosis"),
        ])];
        let table = Arc::new(RouteTable::build(decls, BuildOptions::default()).unwrap());
        let (sink, rx) = ChannelSink::new();
        let controller = NavigationController::new(
            table,
            BasePath::default(),
            Box::new(MemoryHistory::new("/")),
            Box::new(sink),
        );
        (HistoryDriver::new(controller), rx)
    }

    #[tokio::test]
    async fn test_driver_drains_events_until_closed() {
        let (driver, mut renders) = driver();
        let (tx, rx) = mpsc::unbounded_channel();
        let shutdown = Shutdown::new();

        tx.send(HistoryEvent::Push("/animals".into())).unwrap();
        tx.send(HistoryEvent::Named("missing".into())).unwrap();
        tx.send(HistoryEvent::Popped("/".into())).unwrap();
        drop(tx);

        let controller = driver.run(rx, shutdown.subscribe()).await;
        assert_eq!(controller.state().phase, Phase::Resolved);
        assert_eq!(controller.state().location, "/");

        let mut locations = Vec::new();
        while let Ok(event) = renders.try_recv() {
            locations.push(event.location().to_string());
        }
        assert_eq!(locations, vec!["/", "/animals", "/"]);
    }

    #[tokio::test]
    async fn test_driver_stops_on_shutdown() {
        let (driver, _renders) = driver();
        let (_tx, rx) = mpsc::unbounded_channel();
        let shutdown = Shutdown::new();
        let signal = shutdown.subscribe();

        let handle = tokio::spawn(driver.run(rx, signal));
        shutdown.trigger();

        let controller = handle.await.unwrap();
        assert_eq!(controller.state().seq, 1);
    }
}
