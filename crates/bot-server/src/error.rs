//! Error types for the webhook server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors that can occur while handling a webhook call.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The body is not a valid update.
    #[error("Invalid update: {0}")]
    InvalidUpdate(#[from] serde_json::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::InvalidUpdate(err) => {
                tracing::warn!(error = %err, "Rejecting webhook call");
                (StatusCode::BAD_REQUEST, self.to_string())
            }
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for webhook handlers.
pub type Result<T> = std::result::Result<T, ServerError>;
