//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): forwarded requests by method, status
//! - `gateway_request_duration_seconds` (histogram): upstream latency
//! - `audit_exchanges_total` (counter): audit outcome (emitted, excluded, failed)
//!
//! # Design Decisions
//! - Recording without an installed exporter is a no-op, so tests need no setup
//! - Exporter is optional and bound to its own address

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a forwarded request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record the audit outcome of one exchange.
pub fn record_audit(outcome: &'static str) {
    counter!("audit_exchanges_total", "outcome" => outcome).increment(1);
}
