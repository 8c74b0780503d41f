//! REST API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use hearth_store::{Document, DocumentStore, StoreError};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::state::AppState;

/// API error response
#[derive(Serialize)]
struct ApiError {
    error: String,
}

impl ApiError {
    fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

fn error_response(status: StatusCode, msg: impl Into<String>) -> axum::response::Response {
    (status, Json(ApiError::new(msg))).into_response()
}

fn store_error_response(key: &str, e: StoreError) -> axum::response::Response {
    match e {
        StoreError::NotFound(_) => error_response(StatusCode::NOT_FOUND, "Document not found"),
        e => {
            warn!(key = %key, error = %e, "Document store error");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Store error: {}", e),
            )
        }
    }
}

/// Request bodies must be JSON objects
fn into_document(body: Value) -> Option<Document> {
    match body {
        Value::Object(document) => Some(document),
        _ => None,
    }
}

/// Liveness check
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Get current configuration
pub async fn get_config(
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    Json(state.config.clone())
}

/// Get a document by key
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> impl IntoResponse {
    match state.store.get(&key).await {
        Ok(Some(document)) => Json(document).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Document not found"),
        Err(e) => store_error_response(&key, e),
    }
}

/// Replace a document
pub async fn put_document(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let Some(document) = into_document(body) else {
        return error_response(StatusCode::BAD_REQUEST, "Document must be a JSON object");
    };

    match state.store.put(&key, document).await {
        Ok(()) => {
            debug!(key = %key, "Document saved");
            Json(serde_json::json!({ "status": "saved", "key": key })).into_response()
        }
        Err(e) => store_error_response(&key, e),
    }
}

/// Merge top-level fields into an existing document
pub async fn patch_document(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let Some(fields) = into_document(body) else {
        return error_response(StatusCode::BAD_REQUEST, "Patch must be a JSON object");
    };

    match state.store.patch(&key, fields).await {
        Ok(()) => {
            debug!(key = %key, "Document patched");
            Json(serde_json::json!({ "status": "patched", "key": key })).into_response()
        }
        Err(e) => store_error_response(&key, e),
    }
}
