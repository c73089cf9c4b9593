//! Prometheus export for the HTTP metrics recorded by `metrics_middleware`.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Installs the global Prometheus recorder. Later calls are no-ops.
pub fn init_metrics() {
    METRICS_HANDLE.get_or_init(|| match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => handle,
        Err(e) => {
            // Another recorder already owns the global slot; keep a detached
            // handle so /metrics still renders.
            tracing::warn!("Prometheus recorder not installed: {}", e);
            PrometheusBuilder::new().build_recorder().handle()
        }
    });
}

/// Current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}
