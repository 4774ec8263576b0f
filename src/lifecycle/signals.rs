//! OS signal wiring.

use crate::lifecycle::Shutdown;

/// Wait for Ctrl-C and trigger the shutdown coordinator.
pub async fn watch_signals(shutdown: &Shutdown) {
    if tokio::signal::ctrl_c().await.is_ok() {
        shutdown.trigger();
    }
}
