//! Error types for the scheduler and the HTTP service around it.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Fatal errors of a scheduling run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    /// Horizon must cover 1..=366 days
    #[error("Invalid horizon: {0} days (must be 1..=366)")]
    InvalidHorizon(i64),

    /// Break or session limits out of range
    #[error("Invalid preferences: {0}")]
    InvalidPreferences(String),

    /// Run took longer than the caller's wall-clock budget
    #[error("Schedule computation exceeded budget of {budget_ms} ms")]
    ComputationTimeout { budget_ms: u64 },
}

/// Result type alias for scheduler operations
pub type Result<T> = std::result::Result<T, SchedulerError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Scheduler(SchedulerError::ComputationTimeout { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Scheduler(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("{self}");
        }

        (status, self.to_string()).into_response()
    }
}
