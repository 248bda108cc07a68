//! Metrics collection and exposition.
//!
//! # Metrics
//! - `color_requests_total` (counter): requests by method, status, endpoint
//! - `color_request_duration_seconds` (histogram): latency by endpoint
//! - `color_served_total` (counter): rotations by served color
//! - `color_storage_errors_total` (counter): store failures by operation
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and serve it on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

/// Record a finished request.
pub fn record_request(method: &str, status: u16, endpoint: &'static str, start: Instant) {
    counter!(
        "color_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "endpoint" => endpoint
    )
    .increment(1);
    histogram!("color_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

/// Record a color served by a rotation.
pub fn record_served(color: &str) {
    counter!("color_served_total", "color" => color.to_string()).increment(1);
}

/// Record a failed store operation.
pub fn record_storage_error(operation: &'static str) {
    counter!("color_storage_errors_total", "operation" => operation).increment(1);
}
