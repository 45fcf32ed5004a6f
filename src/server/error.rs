//! Error-to-HTTP response conversion.
//!
//! Handlers return `Result<T, AppError>`; public player routes never leak
//! error details, so bodies are just the canonical status text.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use signage_common::Error;

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError {
    inner: Error,
}

impl AppError {
    pub fn new(inner: Error) -> Self {
        Self { inner }
    }

    pub fn not_found() -> Self {
        Self::new(Error::not_found("route"))
    }

    pub fn status(&self) -> StatusCode {
        match &self.inner {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Database(_) | Error::Io(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        Self::new(e)
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::new(Error::internal(format!("blocking task failed: {}", e)))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in handler"
            );
        } else {
            tracing::debug!(status = %status, error = %self.inner, "Request rejected");
        }

        let body = status.canonical_reason().unwrap_or("Error");
        (status, body).into_response()
    }
}
