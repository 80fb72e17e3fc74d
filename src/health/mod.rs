/*!
 * # Health Check Module
 *
 * Endpoints for monitoring the promising service:
 *
 * - Basic health check (`/health`) - Simple up/down status
 * - Readiness check (`/health/ready`) - Whether the service can take traffic
 * - Liveness check (`/health/live`) - Whether the process is alive
 * - Version info (`/health/version`) - Build metadata
 *
 * The service computes promises from in-memory data and holds no external
 * connections, so readiness and liveness are process-level checks.
 */

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::json;
use tracing::info;

/// Returns build and version information
pub async fn version_info() -> impl IntoResponse {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "commit": option_env!("GIT_HASH").unwrap_or("unknown"),
        "built": option_env!("BUILD_TIME").unwrap_or("unknown"),
    }))
}

/// Basic health check endpoint
pub async fn simple_health_check() -> impl IntoResponse {
    info!("Health check endpoint called");

    (
        StatusCode::OK,
        Json(json!({
            "status": "up",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}

/// Readiness check endpoint
pub async fn readiness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "ready": true,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}

/// Liveness check endpoint
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "alive": true,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}

/// Creates the router with health check endpoints
pub fn health_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(simple_health_check))
        .route("/ready", get(readiness_check))
        .route("/live", get(liveness_check))
        .route("/version", get(version_info))
}
