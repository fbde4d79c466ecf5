//! Error types for trendlens

use thiserror::Error;

/// Failure to bring a dataset into memory. Fatal for the server; the
/// dashboard shows it as a status message and keeps its previous dataset.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("invalid arrow data: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    #[error("dataset is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Per-request failure of an aggregate computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("dataset has no column '{0}'")]
    MissingColumn(String),

    #[error("'{0}' is undefined over an empty selection")]
    EmptyResult(String),

    #[error("invalid value '{value}' for parameter '{name}'")]
    InvalidParameter { name: String, value: String },
}

pub type EngineResult<T> = Result<T, EngineError>;

/// The question catalog and the engine registry disagree. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// Each entry reads `category/id: operation`.
    #[error("catalog names unregistered operations: {}", .0.join(", "))]
    UnregisteredOperations(Vec<String>),
}
