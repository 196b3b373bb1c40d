//! Key-value request handlers
//!
//! Reads are served from the local store on every node. Writes pass the role
//! gate, commit locally, and only then fan out to replicas; replication
//! failures never change the response the writing client sees.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::json;

use naskh_core::Error;

use crate::server::AppState;

use super::{error_response, json_error, KeyValue};

/// GET /kv/{key}
pub async fn get_key(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    match state.store.get(&key) {
        Ok(Some(value)) => Json(KeyValue { key, value }).into_response(),
        Ok(None) => error_response(&Error::KeyNotFound),
        Err(e) => error_response(&e),
    }
}

/// GET /kv
pub async fn list_keys(State(state): State<AppState>) -> Response {
    match state.store.keys() {
        Ok(keys) => Json(json!({ "keys": keys })).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Accepted shapes for a PUT body: raw text, or `{"value": ...}` when the
/// Content-Type is JSON.
#[derive(Deserialize)]
struct PutBody {
    #[serde(default)]
    value: String,
}

/// PUT /kv/{key}
pub async fn put_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !state.config.is_primary() {
        return error_response(&Error::WriteRejected);
    }

    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));

    let value = if is_json {
        match serde_json::from_slice::<PutBody>(&body) {
            Ok(parsed) => parsed.value,
            Err(_) => return json_error(StatusCode::BAD_REQUEST, "invalid JSON"),
        }
    } else {
        match String::from_utf8(body.to_vec()) {
            Ok(value) => value,
            Err(_) => return json_error(StatusCode::BAD_REQUEST, "value must be valid UTF-8"),
        }
    };

    // Local commit is the write's outcome; replication happens after.
    if let Err(e) = state.store.set(&key, &value) {
        return error_response(&e);
    }

    if let Some(replicator) = &state.replicator {
        replicator.replicate_set(&key, &value).await;
    }

    Json(KeyValue { key, value }).into_response()
}

/// DELETE /kv/{key}
pub async fn delete_key(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    if !state.config.is_primary() {
        return error_response(&Error::WriteRejected);
    }

    let existed = match state.store.delete(&key) {
        Ok(existed) => existed,
        Err(e) => return error_response(&e),
    };

    // Deletes propagate even when the key was absent here; a replica may
    // still hold it from an earlier missed command.
    if let Some(replicator) = &state.replicator {
        replicator.replicate_delete(&key).await;
    }

    if !existed {
        return error_response(&Error::KeyNotFound);
    }

    Json(json!({ "deleted": key })).into_response()
}

/// PUT /kv (no key)
pub async fn put_no_key(State(state): State<AppState>) -> Response {
    missing_key(&state)
}

/// DELETE /kv (no key)
pub async fn delete_no_key(State(state): State<AppState>) -> Response {
    missing_key(&state)
}

fn missing_key(state: &AppState) -> Response {
    if !state.config.is_primary() {
        return error_response(&Error::WriteRejected);
    }
    error_response(&Error::KeyRequired)
}
