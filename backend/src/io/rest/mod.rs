//! # REST API Interface Layer
//!
//! HTTP endpoints for the KidsBank frontend. Handlers translate JSON to
//! [`FamilyService`](crate::domain::FamilyService) calls and back; they hold no
//! business rules of their own.
//!
//! ## Error Handling
//!
//! Domain errors become JSON `{error, details}` bodies through [`ApiError`]:
//! validation failures are 400, missing children, tasks and rewards are 404.

pub mod ai_apis;
pub mod auth_apis;
pub mod child_apis;
pub mod error;
pub mod state_apis;
pub mod task_apis;

pub use error::{ApiError, ApiResult};

use axum::Router;

use crate::AppState;

/// All API routes, relative to `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(state_apis::router())
        .merge(auth_apis::router())
        .merge(child_apis::router())
        .merge(task_apis::router())
        .merge(ai_apis::router())
}
