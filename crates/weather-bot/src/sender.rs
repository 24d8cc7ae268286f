//! Message sender abstraction for proactive messages.

#[cfg(any(test, feature = "test-util"))]
use std::sync::Mutex;

use async_trait::async_trait;
use telegram::{InlineKeyboardButton, SendMessageRequest, TelegramClient};
use tracing::debug;

#[cfg(any(test, feature = "test-util"))]
use crate::error::BotError;
use crate::error::Result;

/// An action button attached to a proactive message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickReply {
    /// Button label.
    pub label: String,
    /// Payload delivered back as callback data when pressed.
    pub data: String,
}

impl QuickReply {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

/// Trait for pushing messages to users outside of a webhook call.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send plain `text` to `user_id` with optional quick replies.
    async fn send_message(&self, user_id: i64, text: &str, quick_replies: &[QuickReply])
        -> Result<()>;
}

/// Sends through the Bot API. Quick replies become one row of inline buttons.
#[derive(Clone)]
pub struct TelegramSender {
    client: TelegramClient,
}

impl TelegramSender {
    pub fn new(client: TelegramClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MessageSender for TelegramSender {
    async fn send_message(
        &self,
        user_id: i64,
        text: &str,
        quick_replies: &[QuickReply],
    ) -> Result<()> {
        let mut request = SendMessageRequest::text(user_id, text);
        if !quick_replies.is_empty() {
            let row = quick_replies
                .iter()
                .map(|reply| InlineKeyboardButton::callback(&reply.label, &reply.data))
                .collect();
            request = request.with_keyboard_row(row);
        }

        let message = self.client.send_message(&request).await?;
        debug!(user_id, message_id = message.message_id, "Message delivered");
        Ok(())
    }
}

/// A message that went through a [`RecordingSender`].
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub user_id: i64,
    pub text: String,
    pub quick_replies: Vec<QuickReply>,
}

/// Keeps every message in memory. Sends to users listed with
/// [`RecordingSender::failing_for`] fail and are not recorded.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<SentMessage>>,
    failing: Vec<i64>,
}

#[cfg(any(test, feature = "test-util"))]
impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(mut self, user_id: i64) -> Self {
        self.failing.push(user_id);
        self
    }

    /// Messages delivered so far.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[cfg(any(test, feature = "test-util"))]
#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_message(
        &self,
        user_id: i64,
        text: &str,
        quick_replies: &[QuickReply],
    ) -> Result<()> {
        if self.failing.contains(&user_id) {
            return Err(BotError::SendFailed(format!("user {user_id} is unreachable")));
        }

        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(SentMessage {
                user_id,
                text: text.to_string(),
                quick_replies: quick_replies.to_vec(),
            });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_sender() {
        let sender = RecordingSender::new().failing_for(2);

        sender
            .send_message(1, "hello", &[QuickReply::new("a", "b")])
            .await
            .unwrap();
        assert!(sender.send_message(2, "hello", &[]).await.is_err());

        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].user_id, 1);
        assert_eq!(sent[0].quick_replies, vec![QuickReply::new("a", "b")]);
    }
}
