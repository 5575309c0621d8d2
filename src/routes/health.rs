//! Health check endpoint for container orchestration.
//!
//! Returns a fresh `HealthSnapshot` as JSON. Load balancers and ECS health checks
//! hit this path, and the status page reads it, so it must never be cached.

use axum::{extract::State, http::header::CACHE_CONTROL, response::IntoResponse, Json};

use crate::config::CACHE_CONTROL_NO_STORE;
use crate::state::AppState;

/// Health check handler. Always 200; there is no failure path.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.reporter.snapshot();
    tracing::debug!(uptime = snapshot.uptime, "Reporting health");
    ([(CACHE_CONTROL, CACHE_CONTROL_NO_STORE)], Json(snapshot))
}
