//! Configuration for the Telegram client.

use std::env;
use std::time::Duration;

use crate::error::TelegramError;

/// Configuration for the Bot API client.
///
/// | Variable | Default |
/// |----------|---------|
/// | `TELEGRAM_BOT_TOKEN` | required |
/// | `TELEGRAM_API_URL` | `https://api.telegram.org` |
/// | `HTTP_TIMEOUT_SECS` | `10` |
#[derive(Clone)]
pub struct BotConfig {
    /// Bot token issued by BotFather.
    pub token: String,
    /// Base URL of the Bot API.
    pub api_url: String,
    /// Timeout for every request.
    pub timeout: Duration,
}

impl BotConfig {
    /// Create a configuration for the public Bot API.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: "https://api.telegram.org".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, TelegramError> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| TelegramError::Config("TELEGRAM_BOT_TOKEN is not set".to_string()))?;

        let mut config = Self::new(token);

        if let Ok(url) = env::var("TELEGRAM_API_URL") {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(secs) = env::var("HTTP_TIMEOUT_SECS") {
            let secs = secs.parse::<u64>().map_err(|_| {
                TelegramError::Config(format!("HTTP_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// URL of a Bot API method.
    pub fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }
}

// The token is a credential, keep it out of logs.
impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
