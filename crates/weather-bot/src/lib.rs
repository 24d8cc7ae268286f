//! Conversation router, alert evaluator and background pinger for the
//! weather bot.
//!
//! # Architecture
//!
//! ```text
//! Webhook update (from bot-server)
//!          ↓
//! ┌──────────────────────────────────────────────────────────┐
//! │                        ROUTER                            │
//! │                                                          │
//! │  1. Classify: command / callback / free text             │
//! │         ↓                                                │
//! │  2. Read or write the pending question (ConversationStore)│
//! │         ↓                                                │
//! │  3. Geocode (PlaceResolver) → forecast (ForecastSource)  │
//! │     or Set-Home (HomeStore)                              │
//! │         ↓                                                │
//! │  4. Render the reply (MarkdownV2)                        │
//! └──────────────────────────────────────────────────────────┘
//!
//! Timer tick
//!          ↓
//! ┌──────────────────────────────────────────────────────────┐
//! │                        PINGER                            │
//! │                                                          │
//! │  for each home (HomeStore):                              │
//! │     hourly forecast → alert evaluator → MessageSender    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use weather_bot::{Pinger, Router, TelegramSender};
//!
//! let db = Arc::new(database::Database::connect("sqlite:weather-bot.db?mode=rwc").await?);
//! let places = Arc::new(weather::NominatimClient::new(config.clone())?);
//! let forecasts = Arc::new(weather::OpenWeatherMapClient::new(config)?);
//!
//! let router = Router::new(db.clone(), db.clone(), places, forecasts.clone());
//! let reply = router.handle_update(&update).await;
//!
//! let sender = TelegramSender::new(telegram::TelegramClient::new(bot_config)?);
//! let pinger = Pinger::new(db, forecasts, sender, Default::default(), Default::default());
//! let report = pinger.run_once().await;
//! ```

pub mod alerts;
mod config;
mod deadline;
mod error;
pub mod formatting;
mod home;
pub mod messages;
mod pinger;
mod router;
mod sender;
mod store;
mod users;

pub use alerts::AlertConfig;
pub use config::{call_timeout_from_env, zone_from_env};
pub use error::{BotError, Result};
pub use home::set_home;
pub use pinger::{quick_replies, PingReport, Pinger, PingerConfig};
pub use router::{parse_callback, Command, Interaction, ReportKind, Router};
#[cfg(feature = "test-util")]
pub use sender::{RecordingSender, SentMessage};
pub use sender::{MessageSender, QuickReply, TelegramSender};
pub use store::{ConversationStore, HomeStore};
pub use users::{NoOpTracker, UserTracker, UsersServiceClient};
