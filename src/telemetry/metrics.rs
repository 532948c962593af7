//! Prometheus metrics setup and metric definitions

use anyhow::{Context, Result};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Histogram buckets (seconds) for HTTP latency, with sub-millisecond resolution
const LATENCY_BUCKETS: [f64; 12] = [
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .set_buckets(&LATENCY_BUCKETS)
        .context("failed to set histogram buckets")?
        .install_recorder()
        .context("failed to install Prometheus recorder")
}

/// Register metric descriptions and emit initial zero values so the exposition
/// carries HELP/TYPE lines from startup.
pub fn describe_metrics() {
    // HTTP metrics
    describe_counter!(
        "bloodbank_http_requests_total",
        "Total number of HTTP requests"
    );
    describe_histogram!(
        "bloodbank_http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_gauge!(
        "bloodbank_http_requests_in_flight",
        "Number of HTTP requests currently being processed"
    );

    // Domain metrics
    describe_counter!("bloodbank_auth_login_total", "Total number of login attempts");
    describe_counter!(
        "bloodbank_blood_requests_total",
        "Blood request lifecycle events by action (created/approved/cancelled)"
    );

    gauge!("bloodbank_http_requests_in_flight").set(0.0);
    for result in ["success", "failure"] {
        counter!("bloodbank_auth_login_total", "result" => result).absolute(0);
    }
    for action in ["created", "approved", "cancelled"] {
        counter!("bloodbank_blood_requests_total", "action" => action).absolute(0);
    }
}
