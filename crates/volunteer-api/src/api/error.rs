//! API error types and responses
//!
//! This is the only place error kinds are turned into HTTP status codes.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use volunteer_auth::AuthError;
use volunteer_core::{CoreError, Permission};

use crate::storage::StorageError;

/// API error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Authentication failed: {0}")]
    Unauthenticated(#[from] AuthError),

    #[error("Missing permission: {0}")]
    MissingPermission(Permission),

    #[error("Caller is not the resource owner")]
    NotOwner,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error envelope, the failure counterpart of [`ApiResponse`](super::ApiResponse)
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    /// Numeric HTTP status
    pub error: u16,
    pub message: String,
}

impl ApiError {
    /// Status and client-visible message
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad request"),
            ApiError::Unauthenticated(err) => (
                StatusCode::from_u16(err.status()).unwrap_or(StatusCode::UNAUTHORIZED),
                err.code(),
            ),
            ApiError::MissingPermission(_) => (StatusCode::FORBIDDEN, "unauthorized"),
            ApiError::NotOwner => (StatusCode::FORBIDDEN, "access is forbidden"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "resource not found"),
            ApiError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, "method not allowed"),
            ApiError::Unprocessable(_) => (StatusCode::UNPROCESSABLE_ENTITY, "unprocessable"),
            ApiError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = ErrorResponse {
            success: false,
            error: status.as_u16(),
            message: message.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MissingPermission(permission) => ApiError::MissingPermission(permission),
            CoreError::NotOwner => ApiError::NotOwner,
            CoreError::Unprocessable(msg) => ApiError::Unprocessable(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
