//! Resilience helpers.
//!
//! RPC calls get per-call timeouts and failover in `blockchain::client`;
//! this module holds the backoff used when polling the proof session
//! service.

pub mod backoff;

pub use backoff::poll_delay;
