//! Internal replication endpoints
//!
//! `/internal/replicate` is the channel through which replica stores are
//! legitimately mutated; it never consults the public write-admission gate.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use naskh_core::types::Command;
use naskh_core::Error;

use crate::server::AppState;

use super::{error_response, json_error};

/// POST /internal/replicate
pub async fn replicate(State(state): State<AppState>, body: Bytes) -> Response {
    let cmd: Command = match serde_json::from_slice(&body) {
        Ok(cmd) => cmd,
        Err(e) => {
            warn!("Failed to decode replication command: {}", e);
            return error_response(&Error::MalformedCommand(e.to_string()));
        }
    };

    match state.receiver.apply(&cmd) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => {
            warn!("Failed to apply replication command for {}: {}", cmd.key, e);
            error_response(&e)
        }
    }
}

#[derive(Deserialize)]
pub struct SetReplicasRequest {
    pub replicas: Vec<String>,
}

/// PUT /internal/replicas
///
/// Live reconfiguration of the primary's replica endpoint list.
pub async fn set_replicas(
    State(state): State<AppState>,
    Json(request): Json<SetReplicasRequest>,
) -> Response {
    let Some(replicator) = &state.replicator else {
        return json_error(
            StatusCode::BAD_REQUEST,
            "replica list can only be configured on primary node",
        );
    };

    let count = request.replicas.len();
    replicator.set_replica_urls(request.replicas);
    info!("Replica list reconfigured, {} endpoint(s)", count);

    Json(json!({ "replicas": count })).into_response()
}
