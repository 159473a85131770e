//! OS signal handling.
//!
//! Ctrl-C cancels whatever the command is waiting on; the command then
//! reports the cancellation and exits normally.

use tokio::task::JoinHandle;

use crate::lifecycle::shutdown::CancelSignal;

/// Trigger `signal` on the first Ctrl-C.
pub fn spawn_ctrl_c_listener(signal: CancelSignal) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Interrupt received, cancelling");
                signal.trigger();
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            }
        }
    })
}
