//! Client-side route resolution and history synchronization.
//!
//! Resolves a location to a root-to-leaf chain of view references and keeps
//! the host history in step with what is rendered.
//!
//! ```
//! use std::sync::Arc;
//! use view_router::navigation::{BasePath, MemoryHistory, NavigationController, RenderEvent};
//! use view_router::routing::{BuildOptions, RouteDecl, RouteTable};
//!
//! let table = RouteTable::build(
//!     vec![RouteDecl::new("/", "Main").with_children(vec![
//!         RouteDecl::new("", "Diagnosis").named("home"),
//!         RouteDecl::new("/animals", "Diagnosis"),
//!     ])],
//!     BuildOptions::default(),
//! )
//! .unwrap();
//!
//! let mut nav = NavigationController::new(
//!     Arc::new(table),
//!     BasePath::new("/app"),
//!     Box::new(MemoryHistory::new("/app/")),
//!     Box::new(|event: RenderEvent<&'static str>| println!("{:?}", event)),
//! );
//! nav.start();
//! nav.push("/animals");
//! assert_eq!(nav.state().location, "/animals");
//! ```

pub mod config;
pub mod lifecycle;
pub mod navigation;
pub mod observability;
pub mod routing;

pub use config::RouterConfig;
pub use lifecycle::Shutdown;
pub use navigation::NavigationController;
pub use routing::RouteTable;
