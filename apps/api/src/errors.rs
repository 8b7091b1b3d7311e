use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::scoring::batch::InvalidInput;
use crate::scoring::store::StoreError;

const PROCESSING_FAILED: &str = "Error processing scoring request";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Completion error: {0}")]
    Completion(#[from] LlmError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::InvalidInput(e) => (StatusCode::BAD_REQUEST, json!({ "message": e.to_string() })),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "message": msg })),
            AppError::Completion(e) => {
                tracing::error!("Completion error: {e}");
                server_error(e.to_string())
            }
            AppError::Store(e) => {
                tracing::error!("Store error: {e}");
                server_error(e.to_string())
            }
        };

        (status, Json(body)).into_response()
    }
}

fn server_error(detail: String) -> (StatusCode, serde_json::Value) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "message": PROCESSING_FAILED, "error": detail }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_is_bad_request() {
        let response = AppError::from(InvalidInput::Empty).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_completion_failure_is_server_error() {
        let response = AppError::from(LlmError::EmptyContent).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_found_status() {
        let response = AppError::NotFound("missing".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_store_failure_is_server_error() {
        let err = AppError::from(StoreError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
