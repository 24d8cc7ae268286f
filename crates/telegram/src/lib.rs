//! Telegram Bot API types and client.
//!
//! Covers the small part of the Bot API the weather bot needs: decoding
//! webhook updates, answering them inline, and pushing messages with an
//! inline keyboard.
//!
//! # Example
//!
//! ```no_run
//! use telegram::{BotConfig, InlineKeyboardButton, SendMessageRequest, TelegramClient};
//!
//! # async fn example() -> Result<(), telegram::TelegramError> {
//! let client = TelegramClient::new(BotConfig::from_env()?)?;
//!
//! let request = SendMessageRequest::text(1234, "Rain is coming").with_keyboard_row(vec![
//!     InlineKeyboardButton::callback("Check hourly forecast", "hourly:40.4,-3.7"),
//! ]);
//! client.send_message(&request).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::TelegramClient;
pub use config::BotConfig;
pub use error::TelegramError;
pub use types::*;
