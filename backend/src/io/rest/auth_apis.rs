//! # REST API for Sessions

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use shared::{ChildLoginRequest, ParentLoginRequest, User};
use tracing::info;

use crate::io::rest::error::ApiResult;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/parent", post(login_parent))
        .route("/auth/child", post(login_child))
        .route("/auth/logout", post(logout))
}

pub async fn login_parent(
    State(state): State<AppState>,
    Json(request): Json<ParentLoginRequest>,
) -> ApiResult<Json<User>> {
    info!("POST /api/auth/parent - email: {}", request.email);

    let user = state
        .family_service
        .login_parent(request.name.as_deref(), &request.email, &request.password)?;
    Ok(Json(user))
}

pub async fn login_child(
    State(state): State<AppState>,
    Json(request): Json<ChildLoginRequest>,
) -> ApiResult<Json<User>> {
    info!("POST /api/auth/child - child_id: {}", request.child_id);
    Ok(Json(state.family_service.login_child(&request.child_id)?))
}

pub async fn logout(State(state): State<AppState>) -> StatusCode {
    info!("POST /api/auth/logout");
    state.family_service.logout();
    StatusCode::NO_CONTENT
}
