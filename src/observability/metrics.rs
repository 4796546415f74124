//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by content class, status
//! - `proxy_request_duration_seconds` (histogram): time to response head
//! - `proxy_upstream_errors_total` (counter): failed requests by error kind
//! - `proxy_bytes_relayed_total` (counter): segment bytes by stream outcome
//!
//! Recording is a no-op until a recorder is installed, so library code and
//! tests can call these freely.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(class: &'static str, status: u16, start_time: Instant) {
    counter!("proxy_requests_total", "class" => class, "status" => status.to_string()).increment(1);
    histogram!("proxy_request_duration_seconds", "class" => class)
        .record(start_time.elapsed().as_secs_f64());
}

pub fn record_error(kind: &'static str) {
    counter!("proxy_upstream_errors_total", "kind" => kind).increment(1);
}

pub fn record_segment(bytes: u64, outcome: &'static str) {
    counter!("proxy_bytes_relayed_total", "outcome" => outcome).increment(bytes);
}
