//! HTTP API over the engine.
//!
//! - `GET /health`
//! - `GET /api/questions/{category}`
//! - `GET /api/insights/{category}/{id}?region=..&category=..`

mod handlers;
mod types;

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::data::Dataset;
use crate::engine::Engine;

pub use handlers::{get_insight, health_check, list_questions, ApiError};
pub use types::{ErrorResponse, HealthResponse, InsightResponse};

/// Shared, read-only server state.
#[derive(Debug)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub engine: Engine,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        AppState {
            dataset,
            engine: Engine::new(),
        }
    }
}

/// Build the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/questions/{category}", get(list_questions))
        .route("/api/insights/{category}/{id}", get(get_insight))
        .with_state(state)
}
