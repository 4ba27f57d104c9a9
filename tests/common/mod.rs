//! Shared fixtures for integration tests.

use std::sync::{Arc, Mutex};

use view_router::navigation::{BasePath, HistoryMode, MemoryHistory, NavigationController, RenderEvent};
use view_router::routing::{BuildOptions, RouteDecl, RouteTable};

/// The diagnosis front end's route configuration.
#[allow(dead_code)]
pub fn diagnosis_routes() -> Vec<RouteDecl<&'static str>> {
    vec![RouteDecl::new("/", "Main").with_children(vec![
        RouteDecl::new("", "Diagnosis").named("home"),
        RouteDecl::new("/animals", "Diagnosis"),
        RouteDecl::new("/extremum", "Diagnosis"),
    ])]
}

#[allow(dead_code)]
pub fn diagnosis_table() -> Arc<RouteTable<&'static str>> {
    Arc::new(RouteTable::build(diagnosis_routes(), BuildOptions::default()).unwrap())
}

/// Render events recorded by a test sink.
pub type Recorded = Arc<Mutex<Vec<RenderEvent<&'static str>>>>;

/// A controller over the diagnosis routes with an in-memory history.
#[allow(dead_code)]
pub fn diagnosis_controller(base: &str) -> (NavigationController<&'static str>, MemoryHistory, Recorded) {
    let base = BasePath::new(base);
    let initial = HistoryMode::History
        .href("/", &base)
        .unwrap_or_else(|| "/".to_string());
    let history = MemoryHistory::new(initial);

    let recorded: Recorded = Arc::default();
    let sink_recorded = recorded.clone();
    let sink = move |event: RenderEvent<&'static str>| sink_recorded.lock().unwrap().push(event);

    let controller = NavigationController::new(diagnosis_table(), base, Box::new(history.clone()), Box::new(sink));
    (controller, history, recorded)
}
