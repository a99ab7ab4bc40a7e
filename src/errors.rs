use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Bad request error (invalid input, rejected before any upstream call).
    BadRequest(String),
    /// Error from the place-search upstream (non-OK status or transport failure).
    Provider(String),
    /// Error from the reasoning upstream.
    Model(String),
    /// Internal server error.
    Internal(String),
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Provider(msg) => write!(f, "Place search error: {}", msg),
            AppError::Model(msg) => write!(f, "Recommendation service error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into the uniform response envelope.
    ///
    /// Every error body is `{"success": false, "error": ...}`. Validation
    /// failures stay in-band at HTTP 200; upstream failures map to 500.
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::OK, msg.clone()),
            AppError::Provider(msg) => {
                tracing::error!("Place search upstream error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::Model(msg) => {
                tracing::error!("Reasoning upstream error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "success": false,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    /// Converts a `reqwest::Error` into an `AppError`.
    fn from(err: reqwest::Error) -> Self {
        AppError::Provider(err.to_string())
    }
}
