// crates/observability/src/metrics.rs
//! Prometheus metrics recorder for the Worker (§6 "Observability").
//! Mirrors the request/duration/gauge shape used for the hot-path
//! surfaces, but keyed to job-queue concerns: claims, completions,
//! failures, and queue depth.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global Prometheus recorder. Returns `false` if a
/// recorder is already installed (idempotent under repeated calls in
/// tests).
pub fn init_metrics() -> bool {
    if PROMETHEUS_HANDLE.get().is_some() {
        return false;
    }

    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();

    if metrics::set_global_recorder(recorder).is_err() {
        tracing::warn!("failed to install global metrics recorder (already set)");
        return false;
    }
    let _ = PROMETHEUS_HANDLE.set(handle);

    describe_metrics();
    tracing::info!("prometheus metrics initialized");
    true
}

fn describe_metrics() {
    describe_counter!("mnemo_jobs_claimed_total", "Total jobs claimed by this worker");
    describe_counter!("mnemo_jobs_completed_total", "Total jobs completed successfully");
    describe_counter!("mnemo_jobs_failed_total", "Total jobs that exhausted their retry budget");
    describe_histogram!("mnemo_job_duration_seconds", "Job handler duration in seconds");
    describe_gauge!("mnemo_queue_depth", "Jobs currently queued or retrying");
}

pub fn render_metrics() -> Option<String> {
    PROMETHEUS_HANDLE.get().map(|h| h.render())
}

pub fn record_job_claimed(kind: &str) {
    counter!("mnemo_jobs_claimed_total", "kind" => kind.to_string()).increment(1);
}

pub fn record_job_completed(kind: &str, duration: Duration) {
    counter!("mnemo_jobs_completed_total", "kind" => kind.to_string()).increment(1);
    histogram!("mnemo_job_duration_seconds", "kind" => kind.to_string()).record(duration.as_secs_f64());
}

pub fn record_job_failed(kind: &str) {
    counter!("mnemo_jobs_failed_total", "kind" => kind.to_string()).increment(1);
}

pub fn record_queue_depth(depth: f64) {
    gauge!("mnemo_queue_depth").set(depth);
}
