//! # API Route Handlers
//!
//! The Axum handlers for the chat and health endpoints.

use crate::{errors::AppError, state::AppState};
use axum::{extract::State, Json};
use bookrag::Source;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

/// The request body for the `/chat` endpoint.
#[derive(Deserialize)]
pub struct ChatRequest {
    pub query: String,
    #[serde(default = "default_k")]
    pub k: usize,
    #[serde(default)]
    pub metadata_fields: Option<Vec<String>>,
}

fn default_k() -> usize {
    4
}

/// The response body for the `/chat` endpoint.
#[derive(Serialize)]
pub struct ChatResponse {
    pub answer: String,
    pub sources: Vec<Source>,
}

/// The handler for the root (`/`) endpoint.
pub async fn root() -> &'static str {
    "bookrag server is running."
}

/// The handler for the health check (`/health`) endpoint.
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// The handler for the readiness check (`/ready`) endpoint.
///
/// Reports the collection count; an unreachable vector store surfaces as an
/// error response here, never a crash.
pub async fn ready_check(State(app_state): State<AppState>) -> Result<Json<Value>, AppError> {
    let count = app_state.vector_store.count().await?;
    Ok(Json(json!({
        "status": "ready",
        "collection_count": count.to_string(),
    })))
}

/// The handler for the `/chat` endpoint.
pub async fn chat_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    info!(k = payload.k, "Received chat query: '{}'", payload.query);

    let (answer, sources) = app_state
        .chat_client
        .chat(&payload.query, payload.k, payload.metadata_fields.as_deref())
        .await?;

    Ok(Json(ChatResponse { answer, sources }))
}
