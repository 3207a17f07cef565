//! # REST API for the AI Collaborator
//!
//! These endpoints always answer with text when the child exists. A failed or
//! blocked model call shows up as the collaborator's fallback message, not as
//! an HTTP error.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use shared::{ChatRequest, GenerateTextRequest, GenerateTextResponse, GeneratedTasksResponse};
use tracing::info;

use crate::io::rest::error::ApiResult;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ai/generate", post(generate_text))
        .route("/children/:child_id/ai-tasks", post(generate_ai_tasks))
        .route("/children/:child_id/welcome", get(welcome_message))
        .route("/children/:child_id/chat", post(chat))
}

pub async fn generate_text(
    State(state): State<AppState>,
    Json(request): Json<GenerateTextRequest>,
) -> ApiResult<Json<GenerateTextResponse>> {
    info!("POST /api/ai/generate");
    let text = state.family_service.generate_text(&request.prompt).await?;
    Ok(Json(GenerateTextResponse { text }))
}

/// Generate tasks for a child and assign them. An unusable reply adds nothing.
pub async fn generate_ai_tasks(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
) -> ApiResult<Json<GeneratedTasksResponse>> {
    info!("POST /api/children/{}/ai-tasks", child_id);
    let tasks = state.family_service.generate_ai_tasks(&child_id).await?;
    Ok(Json(GeneratedTasksResponse { tasks }))
}

pub async fn welcome_message(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
) -> ApiResult<Json<GenerateTextResponse>> {
    info!("GET /api/children/{}/welcome", child_id);
    let text = state.family_service.welcome_message(&child_id).await?;
    Ok(Json(GenerateTextResponse { text }))
}

pub async fn chat(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
    Json(request): Json<ChatRequest>,
) -> ApiResult<Json<GenerateTextResponse>> {
    info!("POST /api/children/{}/chat", child_id);
    let text = state.family_service.chat(&child_id, &request.message).await?;
    Ok(Json(GenerateTextResponse { text }))
}
