//! Error types and error handling for the HTTP surface
//!
//! All errors implement `IntoResponse` to provide consistent error formatting.

use crate::assistant::AssistantError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Submission rejected by the assistant controller
    #[error(transparent)]
    Assistant(#[from] AssistantError),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Assistant(AssistantError::EmptyInput) => StatusCode::BAD_REQUEST,
            AppError::Assistant(AssistantError::ConcurrentSubmitRejected) => StatusCode::CONFLICT,
            AppError::Assistant(AssistantError::NotReady | AssistantError::Interrupted) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::from(AssistantError::EmptyInput).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(AssistantError::ConcurrentSubmitRejected).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(AssistantError::NotReady).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::from(AssistantError::Interrupted).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::from(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::from(AssistantError::EmptyInput).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
