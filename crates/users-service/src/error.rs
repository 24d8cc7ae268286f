//! Error types for the users service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::DatabaseError;
use thiserror::Error;

/// Errors returned by the users API.
#[derive(Debug, Error)]
pub enum UsersError {
    /// Database error.
    #[error("{0}")]
    Database(#[from] DatabaseError),
}

impl IntoResponse for UsersError {
    fn into_response(self) -> Response {
        let status = match &self {
            UsersError::Database(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            UsersError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = serde_json::json!({
            "error": self.to_string()
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for users handlers.
pub type Result<T> = std::result::Result<T, UsersError>;
