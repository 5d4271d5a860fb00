//! Metrics collection for swasthya-service.
//!
//! Everything goes through the `metrics` facade; the Prometheus recorder is
//! installed once at startup and rendered on `/metrics`.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Later calls are ignored.
pub fn init_metrics() {
    if METRICS_HANDLE.get().is_some() {
        return;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            let _ = METRICS_HANDLE.set(handle);
        }
        Err(e) => tracing::warn!(error = %e, "Failed to install Prometheus recorder"),
    }
}

/// Get metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Family request lifecycle events: submitted, accepted, declined.
pub fn record_family_action(action: &'static str) {
    counter!("family_requests_total", "action" => action).increment(1);
}

/// Chat outcome by backend (`dialogflow` or `simulated`).
pub fn record_chat(backend: &'static str, success: bool) {
    counter!(
        "chat_requests_total",
        "backend" => backend,
        "outcome" => outcome(success)
    )
    .increment(1);
}

pub fn record_generate(success: bool) {
    counter!("generate_requests_total", "outcome" => outcome(success)).increment(1);
}

pub fn record_provider_latency(provider: &'static str, elapsed: Duration) {
    histogram!("provider_latency_seconds", "provider" => provider).record(elapsed.as_secs_f64());
}

fn outcome(success: bool) -> &'static str {
    if success { "success" } else { "failure" }
}
