//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Record per-request dispatch metrics
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `switchyard_requests_total` (counter): requests by method, status
//! - `switchyard_request_duration_seconds` (histogram): dispatch latency
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Labels are method token and numeric status only
//! - Method tokens outside the known verb set are recorded as `OTHER`,
//!   so clients cannot create new series

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::routing::Verb;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(address: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(address).install() {
        Ok(()) => tracing::info!(address = %address, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %address, error = %e, "Failed to start metrics endpoint"),
    }
}

/// Metric label for a request method token.
pub fn method_label(method: &str) -> &'static str {
    Verb::ALL
        .iter()
        .find(|verb| verb.as_str() == method)
        .map_or("OTHER", Verb::as_str)
}

/// Record one dispatched request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let method = method_label(method);
    let status = status.to_string();

    metrics::counter!("switchyard_requests_total", "method" => method, "status" => status.clone())
        .increment(1);
    metrics::histogram!("switchyard_request_duration_seconds", "method" => method, "status" => status)
        .record(start.elapsed().as_secs_f64());
}
