//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): responses by route, status
//! - `gateway_upstream_duration_seconds` (histogram): insights call latency by outcome
//! - `gateway_uploads_total` (counter): uploads by outcome

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(route: &str, status: u16) {
    metrics::counter!(
        "gateway_requests_total",
        "route" => route.to_owned(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_upstream(outcome: &'static str, start: Instant) {
    metrics::histogram!("gateway_upstream_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upload(outcome: &'static str) {
    metrics::counter!("gateway_uploads_total", "outcome" => outcome).increment(1);
}
