//! Catalog and insight handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::types::{ErrorResponse, HealthResponse, InsightResponse};
use super::AppState;
use crate::catalog;
use crate::data::FilterSet;
use crate::error::EngineError;

/// A failed request: status plus `{error}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        let status = match err {
            EngineError::UnknownOperation(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// Health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        rows: state.dataset.len(),
    })
}

/// List the questions of a category.
pub async fn list_questions(Path(category): Path<String>) -> Result<Response, ApiError> {
    let category = catalog::category(&category).ok_or_else(|| {
        ApiError::new(
            StatusCode::NOT_FOUND,
            format!("Category '{category}' not found"),
        )
    })?;
    Ok(Json(category.questions).into_response())
}

/// Answer one question, filtering by the query-string pairs.
pub async fn get_insight(
    State(state): State<Arc<AppState>>,
    Path((category, question_id)): Path<(String, String)>,
    Query(filters): Query<FilterSet>,
) -> Result<Json<InsightResponse>, ApiError> {
    let id: u32 = question_id.parse().map_err(|_| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            format!("Invalid question id '{question_id}'"),
        )
    })?;
    let category = catalog::category(&category).ok_or_else(|| {
        ApiError::new(
            StatusCode::NOT_FOUND,
            format!("Category '{category}' not found"),
        )
    })?;
    let question = category
        .question(id)
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "Question ID not found"))?;

    let data = state
        .engine
        .run(&state.dataset, question.operation, &filters)
        .map_err(|e| {
            log::error!("{}/{id} ({}) failed: {e}", category.name, question.operation);
            ApiError::from(e)
        })?;

    Ok(Json(InsightResponse {
        summary: category.summary,
        data,
        visualization: question.viz,
        filter_text: catalog::filter_text(&filters),
    }))
}
