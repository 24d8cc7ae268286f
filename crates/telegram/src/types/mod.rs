//! Bot API types.

mod send;
mod update;

pub(crate) use send::ApiResponse;
pub use send::{
    escape_markdown, InlineKeyboardButton, InlineKeyboardMarkup, ParseMode, SendMessageRequest,
    WebhookReply,
};
pub use update::{CallbackQuery, Chat, Message, Update, User};
