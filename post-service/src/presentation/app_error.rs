use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

use crate::domain::error::{DomainError, UploadError};
use crate::presentation::response::ApiResponse;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("bad request: {0}")]
    BadRequest(String),
}

pub(crate) type AppResult<T> = Result<T, AppError>;

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Domain(err) => match err {
                DomainError::Validation { .. } | DomainError::InvalidId(_) => {
                    (StatusCode::BAD_REQUEST, err.to_string())
                }
                DomainError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
                DomainError::Upload(UploadError::InvalidFormat(_)) => {
                    (StatusCode::BAD_REQUEST, err.to_string())
                }
                DomainError::Upload(UploadError::Io(_)) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "failed to save file".to_string(),
                ),
                DomainError::LockTimeout(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "post is locked by another request, try again".to_string(),
                ),
                DomainError::Unexpected(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                ),
            },
            AppError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        (status, Json(ApiResponse::failure(message))).into_response()
    }
}
