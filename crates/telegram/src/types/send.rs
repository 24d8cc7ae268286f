//! Types for sending messages.

use serde::{Deserialize, Serialize};

/// Text formatting mode. Replies are always MarkdownV2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseMode {
    MarkdownV2,
}

/// A button of an inline keyboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    /// Data sent back in a callback query when pressed (1-64 bytes).
    pub callback_data: String,
}

impl InlineKeyboardButton {
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: data.into(),
        }
    }
}

/// An inline keyboard attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

/// Parameters of the `sendMessage` method.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SendMessageRequest {
    pub chat_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl SendMessageRequest {
    /// Create a plain text message.
    pub fn text(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            ..Default::default()
        }
    }

    /// Set the parse mode.
    pub fn with_parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = Some(mode);
        self
    }

    /// Append a row of buttons to the inline keyboard.
    pub fn with_keyboard_row(mut self, row: Vec<InlineKeyboardButton>) -> Self {
        self.reply_markup
            .get_or_insert_with(InlineKeyboardMarkup::default)
            .inline_keyboard
            .push(row);
        self
    }
}

/// A method call returned as the body of a webhook response.
///
/// Telegram executes it as if the bot had called the API itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookReply {
    pub method: &'static str,
    #[serde(flatten)]
    pub message: SendMessageRequest,
}

impl WebhookReply {
    /// Answer with a MarkdownV2 message.
    pub fn send_message(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            method: "sendMessage",
            message: SendMessageRequest::text(chat_id, text)
                .with_parse_mode(ParseMode::MarkdownV2),
        }
    }
}

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<u16>,
}

/// Escape text for MarkdownV2.
///
/// See <https://core.telegram.org/bots/api#markdownv2-style>.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '_' | '*' | '[' | ']' | '(' | ')' | '~' | '`' | '>' | '#' | '+' | '-' | '=' | '|'
                | '{' | '}' | '.' | '!' | '\\' | '\''
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_send_message_with_keyboard() {
        let request = SendMessageRequest::text(42, "Heads up")
            .with_keyboard_row(vec![
                InlineKeyboardButton::callback("Hourly", "hourly:1.000000,2.000000"),
                InlineKeyboardButton::callback("Daily", "daily:1.000000,2.000000"),
            ]);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "chat_id": 42,
                "text": "Heads up",
                "reply_markup": {"inline_keyboard": [[
                    {"text": "Hourly", "callback_data": "hourly:1.000000,2.000000"},
                    {"text": "Daily", "callback_data": "daily:1.000000,2.000000"}
                ]]}
            })
        );
    }

    #[test]
    fn test_webhook_reply_shape() {
        let reply = WebhookReply::send_message(7, "hi");
        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(
            value,
            json!({"method": "sendMessage", "chat_id": 7, "text": "hi", "parse_mode": "MarkdownV2"})
        );
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("Madrid"), "Madrid");
        assert_eq!(escape_markdown("St. John's (UK)!"), "St\\. John\\'s \\(UK\\)\\!");
    }
}
