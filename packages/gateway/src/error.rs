//! Application-level error type returned by handlers.
//!
//! Errors are answered with a plain-text body carrying the reason. Client
//! errors never reach the engine; engine failures are passed through with
//! their own message and are not retried.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::engine::EngineError;

/// An error that a handler can return; converts directly to an HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Malformed JSON or a missing/ill-typed field. No engine call was made.
    BadRequest(String),
    /// The engine call failed or returned something unusable.
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest(msg) => {
                tracing::debug!("rejecting request: {msg}");
                msg
            }
            AppError::Internal(msg) => {
                tracing::warn!("request failed: {msg}");
                msg
            }
        };
        (status, message).into_response()
    }
}

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        AppError::Internal(e.to_string())
    }
}
