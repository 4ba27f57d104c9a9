//! Navigation subsystem.
//!
//! # Data Flow
//! ```text
//! Link click / programmatic call / back-forward (host)
//!     → driver.rs (optional async event loop)
//!     → controller.rs (sequence number, phase transitions)
//!         → base.rs (strip deployment prefix)
//!         → routing::matcher (resolve chain)
//!         → history.rs (push / replace visible URL)
//!     → render.rs (RenderEvent to the injected RenderSink)
//! ```
//!
//! # Design Decisions
//! - No global router: the composition root owns the controller and injects
//!   history and render collaborators
//! - Last request wins; superseded results are discarded silently
//! - Not-found is a normal outcome with its own render event

pub mod base;
pub mod controller;
pub mod driver;
pub mod history;
pub mod render;

pub use base::BasePath;
pub use controller::{
    NavigationController, NavigationError, NavigationOutcome, NavigationState, NavigationTrigger, PendingNavigation,
    Phase,
};
pub use driver::{HistoryDriver, HistoryEvent};
pub use history::{History, HistoryMode, MemoryHistory};
pub use render::{ChannelSink, RenderEvent, RenderSink, ViewBinding};
