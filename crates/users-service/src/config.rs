//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

/// Users service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `USERS_ADDR` | Server bind address | `127.0.0.1:8081` |
    /// | `DATABASE_URL` | SQLite database URL | `sqlite:weather-bot.db?mode=rwc` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("USERS_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8081".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:weather-bot.db?mode=rwc".to_string());

        Ok(Self { addr, database_url })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid USERS_ADDR format")]
    InvalidAddr,
}
