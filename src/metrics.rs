use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Install the global Prometheus recorder
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;

    init_metric_descriptions();

    Ok(handle)
}

/// Initialize metric descriptions (can be called multiple times safely)
fn init_metric_descriptions() {
    describe_counter!(
        "kea_relay_requests_total",
        "Total number of chat requests received"
    );
    describe_counter!(
        "kea_relay_tokens_total",
        "Total number of tokens reported by upstream"
    );
    describe_histogram!(
        "kea_relay_request_duration_seconds",
        "Upstream round-trip duration in seconds"
    );
    describe_counter!(
        "kea_relay_errors_total",
        "Total number of failed chat requests"
    );
    describe_gauge!("kea_relay_info", "Relay version information");

    gauge!("kea_relay_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Record an inbound chat request
pub fn record_request(endpoint: &str) {
    counter!(
        "kea_relay_requests_total",
        "endpoint" => endpoint.to_string(),
    )
    .increment(1);
}

/// Record tokens
pub fn record_tokens(deployment: &str, token_type: &str, count: u64) {
    counter!(
        "kea_relay_tokens_total",
        "deployment" => deployment.to_string(),
        "type" => token_type.to_string(),
    )
    .increment(count);
}

/// Record upstream round-trip duration
pub fn record_duration(deployment: &str, duration: Duration) {
    histogram!(
        "kea_relay_request_duration_seconds",
        "deployment" => deployment.to_string(),
    )
    .record(duration.as_secs_f64());
}

/// Record a failed request
pub fn record_error(error_type: &str, status: u16) {
    counter!(
        "kea_relay_errors_total",
        "type" => error_type.to_string(),
        "status" => status.to_string(),
    )
    .increment(1);
}
