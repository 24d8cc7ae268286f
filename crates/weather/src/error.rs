//! Error types for the weather providers.

use thiserror::Error;

/// Errors that can occur when talking to a forecast or geocoding provider.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// HTTP request failed (connection, timeout, body decoding).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The place could not be resolved.
    #[error("Place not found: {0}")]
    NotFound(String),

    /// The provider answered with a payload we could not interpret.
    #[error("Unexpected response: {0}")]
    Parse(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for weather operations.
pub type Result<T> = std::result::Result<T, WeatherError>;
