//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

/// Default SQLite database URL.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:weather-bot.db?mode=rwc";

/// Webhook server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Usernames allowed to talk to the bot, lowercased. Empty allows everyone.
    pub authorised_users: Vec<String>,
    /// Base URL of the users service, if user tracking is enabled.
    pub users_service_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `BOT_ADDR` | Server bind address | `127.0.0.1:8080` |
    /// | `DATABASE_URL` | SQLite database URL | `sqlite:weather-bot.db?mode=rwc` |
    /// | `AUTHORISED_USERS` | Comma-separated usernames | (everyone) |
    /// | `USERS_SERVICE_URL` | Users service base URL | (tracking disabled) |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("BOT_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let authorised_users = env::var("AUTHORISED_USERS")
            .map(|raw| parse_authorised_users(&raw))
            .unwrap_or_default();

        let users_service_url = env::var("USERS_SERVICE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        Ok(Self {
            addr,
            database_url,
            authorised_users,
            users_service_url,
        })
    }
}

/// Split a comma-separated list of usernames. A leading `@` is ignored.
pub fn parse_authorised_users(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|name| name.trim().trim_start_matches('@').to_lowercase())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid BOT_ADDR format")]
    InvalidAddr,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_authorised_users() {
        assert_eq!(
            parse_authorised_users(" Ada, @grace ,,linus "),
            vec!["ada", "grace", "linus"]
        );
        assert!(parse_authorised_users("").is_empty());
        assert!(parse_authorised_users(" , ").is_empty());
    }
}
