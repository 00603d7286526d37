//! Health Routes
//!
//! Health check endpoints for monitoring.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (ready to serve traffic)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 200 once at least one room sensor is configured.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.tracker.sensor_count() > 0 {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health
///
/// Full health status. "waiting" until the first sensor report arrives.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let snapshot = state.tracker.snapshot().await;
    let status = if snapshot.total_time > 0 {
        "healthy"
    } else {
        "waiting"
    };

    Json(HealthResponse {
        status: status.to_string(),
        sensors: state.tracker.sensor_count(),
        total_time: snapshot.total_time,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
