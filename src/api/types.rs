//! Request/Response types for the insights API.

use serde::Serialize;

use crate::catalog::VizHint;
use crate::engine::AggregateResult;

/// Successful answer to one catalog question.
#[derive(Debug, Serialize)]
pub struct InsightResponse {
    /// Category summary, e.g. "Sales & Product Trends Analysis".
    pub summary: &'static str,
    /// The aggregate, in its result order.
    pub data: AggregateResult,
    /// Rendering hint for the dashboard.
    pub visualization: VizHint,
    /// Context for the active filters, empty when unrestricted.
    pub filter_text: String,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Rows in the loaded dataset.
    pub rows: usize,
}
