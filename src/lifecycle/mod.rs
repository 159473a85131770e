//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → Resolve chain → Load wallet → RPC client → Session
//!
//! Cancellation (shutdown.rs):
//!     CancelSignal::trigger → every subscribed wait gives up
//!
//! Signals (signals.rs):
//!     SIGINT → CancelSignal::trigger
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{cancelled, CancelSignal};
pub use startup::{AppContext, StartupError};
