//! Prometheus scrape endpoint. Never gated by the readiness guard.

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;

const PROMETHEUS_TEXT: &str = "text/plain; version=0.0.4; charset=utf-8";

/// GET /metrics — store operation counters, latency histograms and guard rejections.
pub async fn get(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    // Histogram buckets are only drained on upkeep
    handle.run_upkeep();
    ([(CONTENT_TYPE, PROMETHEUS_TEXT)], handle.render())
}
