use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// A task run that failed.
///
/// By the time this error is returned, the failed run has already been
/// appended to the store; the error carries the same message as the record.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct TaskRunError {
    pub message: String,
}

impl From<String> for TaskRunError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

/// Errors surfaced through the HTTP API as JSON `{"detail": ...}` payloads.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Task not found")]
    TaskNotFound,
    #[error("{0}")]
    TaskFailed(#[from] TaskRunError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::TaskNotFound => StatusCode::NOT_FOUND,
            ApiError::TaskFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
