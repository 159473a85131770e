//! Metrics collection and exposition.
//!
//! # Metrics
//! - `eduseal_workflow_transitions_total` (counter): phase changes by from/to
//! - `eduseal_mint_outcomes_total` (counter): confirmed / reverted / failed
//! - `eduseal_rpc_healthy` (gauge): 1=reachable, 0=unreachable
//! - `eduseal_talent_candidates` (gauge): candidates from the last log scan

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Start the Prometheus exporter on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics exporter"),
    }
}

pub fn record_transition(from: &'static str, to: &'static str) {
    ::metrics::counter!("eduseal_workflow_transitions_total", "from" => from, "to" => to)
        .increment(1);
}

pub fn record_mint_outcome(outcome: &'static str) {
    ::metrics::counter!("eduseal_mint_outcomes_total", "outcome" => outcome).increment(1);
}

pub fn record_rpc_health(healthy: bool) {
    ::metrics::gauge!("eduseal_rpc_healthy").set(if healthy { 1.0 } else { 0.0 });
}

pub fn record_candidates(count: usize) {
    ::metrics::gauge!("eduseal_talent_candidates").set(count as f64);
}
