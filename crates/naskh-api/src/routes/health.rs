//! Health, readiness, and role reporting

use axum::extract::State;
use axum::response::Json;
use serde::Serialize;

use naskh_core::local_hostname;

use crate::server::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    hostname: String,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    status: &'static str,
    role: String,
    keys: u64,
    uptime_secs: u64,
    hostname: String,
}

#[derive(Serialize)]
pub struct RoleResponse {
    role: String,
    hostname: String,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        hostname: local_hostname(),
    })
}

/// GET /ready
pub async fn ready(State(state): State<AppState>) -> Json<ReadyResponse> {
    Json(ReadyResponse {
        status: "ready",
        role: state.config.role.to_string(),
        keys: state.store.len().unwrap_or(0),
        uptime_secs: state.start_time.elapsed().as_secs(),
        hostname: local_hostname(),
    })
}

/// GET /role
pub async fn role(State(state): State<AppState>) -> Json<RoleResponse> {
    Json(RoleResponse {
        role: state.config.role.to_string(),
        hostname: local_hostname(),
    })
}
