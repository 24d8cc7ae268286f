//! Types for incoming webhook updates.

use serde::{Deserialize, Serialize};

/// An update delivered to the webhook.
///
/// Only the fields the bot uses are modelled; unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

impl Update {
    /// The user that triggered the update.
    pub fn sender(&self) -> Option<&User> {
        self.message
            .as_ref()
            .and_then(|m| m.from.as_ref())
            .or_else(|| self.callback_query.as_ref().map(|q| &q.from))
    }

    /// The chat to answer in. Falls back to the sender for callback queries
    /// whose message is no longer available.
    pub fn chat_id(&self) -> Option<i64> {
        if let Some(message) = &self.message {
            return Some(message.chat.id);
        }
        self.callback_query.as_ref().map(|q| {
            q.message
                .as_ref()
                .map(|m| m.chat.id)
                .unwrap_or(q.from.id)
        })
    }
}

/// A Telegram user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
}

/// A chat.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// A message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub date: i64,
    #[serde(default)]
    pub text: Option<String>,
}

/// A press on an inline keyboard button.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_update() {
        let json = r#"{
            "update_id": 10000,
            "message": {
                "message_id": 1365,
                "from": {"id": 1111111, "is_bot": false, "first_name": "Test", "last_name": "Lastname",
                         "username": "Test", "language_code": "en"},
                "chat": {"id": 1111111, "first_name": "Test", "type": "private"},
                "date": 1441645532,
                "text": "/daily Madrid"
            }
        }"#;

        let update: Update = serde_json::from_str(json).unwrap();
        let message = update.message.as_ref().unwrap();
        assert_eq!(message.text.as_deref(), Some("/daily Madrid"));
        assert_eq!(message.chat.kind, "private");
        assert_eq!(update.sender().unwrap().username.as_deref(), Some("Test"));
        assert_eq!(update.chat_id(), Some(1111111));
    }

    #[test]
    fn test_callback_update() {
        let json = r#"{
            "update_id": 10001,
            "callback_query": {
                "id": "4382bfdwdsb323b2d9",
                "from": {"id": 1111111, "is_bot": false, "first_name": "Test"},
                "data": "hourly:40.416800,-3.703800"
            }
        }"#;

        let update: Update = serde_json::from_str(json).unwrap();
        assert!(update.message.is_none());
        let query = update.callback_query.as_ref().unwrap();
        assert_eq!(query.data.as_deref(), Some("hourly:40.416800,-3.703800"));
        assert_eq!(update.sender().unwrap().id, 1111111);
        assert_eq!(update.chat_id(), Some(1111111));
    }

    #[test]
    fn test_unsupported_update() {
        let update: Update =
            serde_json::from_str(r#"{"update_id": 3, "edited_message": {}}"#).unwrap();
        assert!(update.sender().is_none());
        assert!(update.chat_id().is_none());
    }
}
