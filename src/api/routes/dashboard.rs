//! Dashboard Routes
//!
//! - GET / - Status page (floor plan, pie charts, auto reload)
//! - GET /static/floor-plan.svg - Floor plan behind the pet icons
//! - GET /api/v1/status - Same data as JSON

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use std::sync::Arc;

use crate::api::dto::StatusResponse;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::dashboard::{render_dashboard, FLOOR_PLAN_SVG};

/// GET /
///
/// Renders the page from the current snapshot.
pub async fn index(State(state): State<Arc<AppState>>) -> ApiResult<Html<String>> {
    let snapshot = state.tracker.snapshot().await;
    let html = render_dashboard(&snapshot, state.config.refresh_secs)?;
    Ok(Html(html))
}

/// GET /static/floor-plan.svg
pub async fn floor_plan() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        FLOOR_PLAN_SVG,
    )
}

/// GET /api/v1/status
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        snapshot: state.tracker.snapshot().await,
        refresh_secs: state.config.refresh_secs,
    })
}
