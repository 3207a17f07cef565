//! # REST API for Tasks and Rewards

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use shared::{CompleteTaskResponse, CreateTaskRequest, RewardItem, Task, TaskListQuery};
use tracing::info;

use crate::domain::rewards::reward_catalog;
use crate::io::rest::error::ApiResult;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/:task_id/complete", post(complete_task))
        .route("/rewards", get(list_rewards))
}

/// List tasks, optionally only those of one child
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<TaskListQuery>,
) -> Json<Vec<Task>> {
    info!("GET /api/tasks - child_id: {:?}", query.child_id);

    let tasks = match query.child_id.as_deref() {
        Some(child_id) => state.family_service.tasks_for_child(child_id),
        None => state.family_service.list_tasks(),
    };
    Json(tasks)
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(request): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    info!("POST /api/tasks - request: {:?}", request);
    let task = state.family_service.create_task(request)?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn complete_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<CompleteTaskResponse>> {
    info!("POST /api/tasks/{}/complete", task_id);
    Ok(Json(state.family_service.complete_task(&task_id)?))
}

/// The rewards store catalog
pub async fn list_rewards() -> Json<Vec<RewardItem>> {
    info!("GET /api/rewards");
    Json(reward_catalog())
}
