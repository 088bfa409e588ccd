// crates/observability/src/routes.rs
//! Health and metrics HTTP surface exposed by the Worker (§6). The
//! hook binaries are short-lived and stdin/stdout only — they don't
//! mount this router.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::time::Instant;

use crate::metrics::render_metrics;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

async fn health_check(started_at: axum::extract::Extension<Instant>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: started_at.0.elapsed().as_secs(),
    })
}

async fn metrics_handler() -> Response {
    match render_metrics() {
        Some(body) => (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")], body).into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "metrics not initialized").into_response(),
    }
}

/// Build the `/health` + `/metrics` router, stamped with the process
/// start time for uptime reporting.
pub fn router(started_at: Instant) -> Router {
    Router::new().route("/health", get(health_check)).route("/metrics", get(metrics_handler)).layer(axum::Extension(started_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_returns_ok_status() {
        let app = router(Instant::now());
        let response = app.oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_returns_503_before_init() {
        let app = router(Instant::now());
        let response = app.oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
