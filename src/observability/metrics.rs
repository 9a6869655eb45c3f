//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): forwarded requests by method, status
//! - `gateway_request_duration_seconds` (histogram): latency by method
//! - `gateway_auth_attempts_total` (counter): attempts by authenticator, outcome
//! - `gateway_header_source_errors_total` (counter): swallowed source failures
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Exporter runs on its own listener, separate from the data path

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on a dedicated listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one forwarded request.
pub fn record_request(method: &str, status: u16, start_time: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "gateway_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(start_time.elapsed().as_secs_f64());
}

/// Record one authenticator attempt.
pub fn record_auth_outcome(authenticator: &str, outcome: &'static str) {
    counter!(
        "gateway_auth_attempts_total",
        "authenticator" => authenticator.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a header source whose contribution was discarded.
pub fn record_source_error(source: &str) {
    counter!(
        "gateway_header_source_errors_total",
        "source" => source.to_string()
    )
    .increment(1);
}
