//! Client for the users service.
//!
//! Every authorised update is reported so the service can keep a record of
//! who talked to the bot. Tracking is best-effort: callers log failures and
//! carry on.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::debug;

use crate::error::{BotError, Result};

/// Records users that interacted with the bot.
#[async_trait]
pub trait UserTracker: Send + Sync {
    async fn track(&self, user: &telegram::User) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct TrackUserRequest<'a> {
    username: Option<&'a str>,
    first_name: &'a str,
    last_name: Option<&'a str>,
    language_code: Option<&'a str>,
}

/// HTTP client for `PUT /users/{id}`.
#[derive(Debug, Clone)]
pub struct UsersServiceClient {
    http: Client,
    base_url: String,
}

impl UsersServiceClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn user_url(&self, user_id: i64) -> String {
        format!("{}/users/{}", self.base_url, user_id)
    }
}

#[async_trait]
impl UserTracker for UsersServiceClient {
    async fn track(&self, user: &telegram::User) -> Result<()> {
        let body = TrackUserRequest {
            username: user.username.as_deref(),
            first_name: &user.first_name,
            last_name: user.last_name.as_deref(),
            language_code: user.language_code.as_deref(),
        };

        let response = self
            .http
            .put(self.user_url(user.id))
            .json(&body)
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED => {
                debug!(user_id = user.id, "New user tracked");
                Ok(())
            }
            StatusCode::ACCEPTED => Ok(()),
            status => Err(BotError::Users(format!(
                "unexpected status {} tracking user {}",
                status, user.id
            ))),
        }
    }
}

/// Tracker that does nothing, for deployments without a users service.
#[derive(Debug, Clone, Default)]
pub struct NoOpTracker;

#[async_trait]
impl UserTracker for NoOpTracker {
    async fn track(&self, _user: &telegram::User) -> Result<()> {
        Ok(())
    }
}
