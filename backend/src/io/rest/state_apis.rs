//! # REST API for the Raw Store
//!
//! Read the whole state, or dispatch an action exactly as the reducer sees it.

use axum::{extract::State, response::Json, routing::{get, post}, Router};
use serde_json::Value;
use tracing::info;

use crate::domain::{Action, StoreState};
use crate::io::rest::error::{ApiError, ApiResult};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/state", get(get_state))
        .route("/actions", post(dispatch_action))
}

/// Current store state
pub async fn get_state(State(state): State<AppState>) -> Json<StoreState> {
    info!("GET /api/state");
    Json(state.family_service.state())
}

/// Dispatch a `{type, payload}` action and return the resulting state.
/// Unknown action types are refused before the store is touched.
pub async fn dispatch_action(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<StoreState>> {
    let action: Action = serde_json::from_value(body)
        .map_err(|e| ApiError::BadRequest(format!("Unrecognized action: {}", e)))?;
    info!("POST /api/actions - {}", action.kind());

    let next = if state.strict_validation {
        state.family_service.dispatch_checked(action)?
    } else {
        state.family_service.dispatch(action)
    };
    Ok(Json(next))
}
