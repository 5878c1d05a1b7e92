//! Metrics collection and exposition.
//!
//! # Metrics
//! - `checker_probes_total` (counter): probes by monitor and outcome
//! - `checker_measurements_total` (counter): finished cycles by monitor
//! - `checker_failed_tests_total` (counter): failed tests by monitor
//! - `checker_verdict_transitions_total` (counter): label changes by from/to
//! - `checker_cluster_health_code` (gauge): current aggregated health code
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::health::state::Measurement;
use crate::health::verdict::Verdict;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the outcome of a single probe ("success", "failure", "error").
pub fn record_probe(monitor_id: usize, outcome: &'static str) {
    metrics::counter!(
        "checker_probes_total",
        "monitor" => monitor_id.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a finished cycle.
pub fn record_measurement(measurement: &Measurement) {
    let monitor = measurement.monitor_id.to_string();
    metrics::counter!("checker_measurements_total", "monitor" => monitor.clone()).increment(1);
    metrics::counter!("checker_failed_tests_total", "monitor" => monitor).increment(measurement.failed);
}

pub fn record_verdict_transition(from: Verdict, to: Verdict) {
    metrics::counter!(
        "checker_verdict_transitions_total",
        "from" => from.as_str(),
        "to" => to.as_str()
    )
    .increment(1);
}

pub fn record_cluster_health(code: u16) {
    metrics::gauge!("checker_cluster_health_code").set(code as f64);
}
