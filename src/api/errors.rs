use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::response::ApiResponse;
use crate::domain::repositories::RepositoryError;

/// API error type with HTTP status code, message, and underlying cause
///
/// Rendered as the standard envelope with `success: false`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub error: Option<String>,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            error: None,
        }
    }

    /// Attaches the underlying error text
    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 401 Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Creates a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Creates a 500 Internal Server Error
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Maps a repository failure for an operation described by `message`
    ///
    /// Duplicate emails are a client error; everything else is a 500 that
    /// carries the raw cause.
    pub fn from_repository(message: &str, err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateEmail => Self::bad_request("Email already registered"),
            RepositoryError::Database(cause) => {
                Self::internal_server_error(message).with_error(cause)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                status = %self.status,
                error = self.error.as_deref().unwrap_or(""),
                "{}",
                self.message
            );
        }

        (self.status, ApiResponse::failure(self.message, self.error)).into_response()
    }
}
