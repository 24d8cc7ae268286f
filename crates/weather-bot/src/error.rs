//! Error types for the bot.

use std::time::Duration;

use database::DatabaseError;
use telegram::TelegramError;
use thiserror::Error;
use weather::WeatherError;

/// Errors that can occur while handling an interaction or running the pinger.
///
/// None of these reach the user verbatim; the router maps them to one of the
/// static replies in [`crate::messages`].
#[derive(Debug, Error)]
pub enum BotError {
    /// Conversation or home store failure.
    #[error("Store error: {0}")]
    Store(#[from] DatabaseError),

    /// Forecast or geocoding failure.
    #[error("Weather provider error: {0}")]
    Weather(#[from] WeatherError),

    /// Bot API failure.
    #[error("Telegram error: {0}")]
    Telegram(#[from] TelegramError),

    /// HTTP failure talking to the users service.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// An external call took longer than allowed.
    #[error("Timed out after {limit:?} waiting for {operation}")]
    Timeout {
        operation: &'static str,
        limit: Duration,
    },

    /// Callback data that does not match `kind:lat,lon`.
    #[error("Invalid callback data: {0}")]
    InvalidCallback(String),

    /// The users service answered with an unexpected status.
    #[error("Users service error: {0}")]
    Users(String),

    /// A message could not be delivered.
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for bot operations.
pub type Result<T> = std::result::Result<T, BotError>;
