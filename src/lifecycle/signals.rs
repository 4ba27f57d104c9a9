//! OS signal handling.
//!
//! Ctrl-C (SIGINT) triggers the shared `Shutdown`; a failure to install the
//! handler is logged and leaves shutdown to the other exit paths.

use std::sync::Arc;

use crate::lifecycle::shutdown::Shutdown;

/// Spawn a task that triggers `shutdown` on Ctrl-C.
pub fn shutdown_on_ctrl_c(shutdown: Arc<Shutdown>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Interrupt received, shutting down");
                shutdown.trigger();
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl-C"),
        }
    })
}
