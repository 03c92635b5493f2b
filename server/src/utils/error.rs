use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::store::StoreError;
use crate::utils::response::error as error_response;

/// Message returned for every rejected order payload.
pub const INVALID_INPUT_MESSAGE: &str = "Invalid input data";

#[derive(Debug, Error)]
pub enum AppError {
    /// The payload failed validation. The reason is logged but never returned.
    #[error("Invalid input data: {0}")]
    InvalidInput(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Storage error")]
    Store(#[from] StoreError),

    #[error("Internal server error")]
    InternalServerError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Store(_) => "DATABASE_ERROR",
            AppError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::InvalidInput(reason) => {
                warn!(code = self.code(), reason = %reason, "Rejected order payload");
            }
            AppError::NotFound(msg) => {
                warn!(code = self.code(), message = %msg, "Resource not found");
            }
            AppError::InternalServerError(msg) => {
                error!(code = self.code(), message = %msg, "Application error");
            }
            AppError::Store(e) => {
                error!(code = self.code(), error = ?e, "Storage error");
            }
        }
    }

    /// Message that is safe to hand back to the client.
    pub fn public_message(&self) -> String {
        match self {
            AppError::InvalidInput(_) => INVALID_INPUT_MESSAGE.to_string(),
            AppError::NotFound(msg) | AppError::InternalServerError(msg) => msg.clone(),
            AppError::Store(_) => "A database error occurred".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        error_response(self.public_message(), self.status_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_hides_reason() {
        let err = AppError::InvalidInput("user_id is empty".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), INVALID_INPUT_MESSAGE);
    }

    #[test]
    fn test_store_errors_are_opaque() {
        let err = AppError::from(StoreError::DuplicateBarcode);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "DATABASE_ERROR");
        assert_eq!(err.public_message(), "A database error occurred");
    }
}
