//! Bot API HTTP client.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::BotConfig;
use crate::error::TelegramError;
use crate::types::{ApiResponse, Message, SendMessageRequest, User};

/// Client for the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    config: BotConfig,
}

impl TelegramClient {
    /// Create a new client. Every request is bounded by `config.timeout`.
    pub fn new(config: BotConfig) -> Result<Self, TelegramError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(TelegramError::Http)?;

        Ok(Self { http, config })
    }

    /// Get the bot's own user. Useful to validate the token at startup.
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call::<(), _>("getMe", None).await
    }

    /// Send a message.
    pub async fn send_message(
        &self,
        request: &SendMessageRequest,
    ) -> Result<Message, TelegramError> {
        debug!(chat_id = request.chat_id, "Sending message");
        self.call("sendMessage", Some(request)).await
    }

    async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: Option<&P>,
    ) -> Result<R, TelegramError> {
        let url = self.config.method_url(method);

        let request = match params {
            Some(params) => self.http.post(&url).json(params),
            None => self.http.get(&url),
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        let parsed: ApiResponse<R> = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) if status.is_success() => return Err(TelegramError::Json(e)),
            Err(_) => {
                return Err(TelegramError::Api {
                    code: status.as_u16(),
                    description: body,
                })
            }
        };

        match (parsed.ok, parsed.result) {
            (true, Some(result)) => Ok(result),
            _ => {
                let code = parsed.error_code.unwrap_or(status.as_u16());
                let description = parsed
                    .description
                    .unwrap_or_else(|| "no description".to_string());
                warn!(method = %method, code, description = %description, "Bot API call failed");
                Err(TelegramError::Api { code, description })
            }
        }
    }
}
