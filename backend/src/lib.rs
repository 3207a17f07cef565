//! # KidsBank Backend
//!
//! Non-UI logic for KidsBank, a family finance app where parents fund their
//! children's wallets and assign tasks, and children earn, save and spend.
//!
//! - **Domain**: The state store, its validation layer and family operations
//! - **Storage**: Where the state snapshot is persisted between sessions
//! - **IO**: The REST API and the Gemini client
//!
//! ```text
//! Frontend
//!     ↓
//! IO Layer (REST API)
//!     ↓
//! Domain Layer (FamilyService → Store → transition)
//!     ↓            ↘
//! Storage Layer    Gemini (TextGenerator)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::config::Config;
use crate::domain::{FamilyService, Store};
use crate::io::gemini::{GeminiClient, TextGenerator};
use crate::storage::{JsonFileStorage, StateStorage};

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub family_service: FamilyService,
    /// Validate actions posted to `/api/actions` before dispatching them
    pub strict_validation: bool,
}

/// Hydrate a store from `storage` and wrap it in the application state
pub fn build_app_state(
    storage: Box<dyn StateStorage>,
    generator: Arc<dyn TextGenerator>,
    strict_validation: bool,
) -> AppState {
    let mut store = Store::new(storage);
    store.hydrate();

    AppState {
        family_service: FamilyService::new(store, generator),
        strict_validation,
    }
}

/// Initialize the backend from configuration
pub fn initialize_backend(config: &Config) -> Result<AppState> {
    info!("Setting up storage in {}", config.data_dir.display());
    let storage = JsonFileStorage::new(&config.data_dir)?;

    info!("Setting up Gemini client with model {}", config.gemini_model);
    let gemini = GeminiClient::new(config.gemini_api_key.clone())
        .with_model(config.gemini_model.clone())
        .with_base_url(config.gemini_base_url.clone());
    if !gemini.has_api_key() {
        warn!("GEMINI_API_KEY is not set; AI features will return a fallback message");
    }

    info!("Setting up application state");
    Ok(build_app_state(
        Box::new(storage),
        Arc::new(gemini),
        config.strict_validation,
    ))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, frontend_url: &str) -> Result<Router> {
    let origin = frontend_url
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid frontend URL: {}", frontend_url))?;

    // CORS setup to allow frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Ok(Router::new()
        .nest("/api", io::rest::api_routes())
        .layer(cors)
        .with_state(app_state))
}
