//! Interaction router.
//!
//! Classifies an inbound update, drives the per-chat conversation state and
//! produces the reply text. Replies are MarkdownV2.
//!
//! State handling:
//!
//! - A command with an argument is answered directly. Whatever question was
//!   pending is marked answered first, so a later free-text message is not
//!   taken as its answer.
//! - A command without an argument records the matching question (last
//!   write wins) and replies with the prompt.
//! - Free text answers the pending question. Without one it gets the
//!   "not sure what you mean" reply and the store is left untouched.

use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;
use database::Question;
use telegram::{Update, User, WebhookReply};
use tracing::{debug, error, instrument, warn};
use weather::{ForecastSource, PlaceResolver};

use crate::deadline::with_deadline;
use crate::error::{BotError, Result};
use crate::formatting::{forecast_table, hourly_window, RenderOptions};
use crate::home;
use crate::messages;
use crate::store::{ConversationStore, HomeStore};

/// A recognised slash command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Daily,
    Hourly,
    Home,
    /// `/help` or `/start`.
    Help,
}

impl Command {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "daily" => Some(Command::Daily),
            "hourly" => Some(Command::Hourly),
            "home" => Some(Command::Home),
            "help" | "start" => Some(Command::Help),
            _ => None,
        }
    }

    /// Question asked when the command comes without an argument.
    pub fn question(&self) -> Option<Question> {
        match self {
            Command::Daily => Some(Question::DailyLocation),
            Command::Hourly => Some(Question::HourlyLocation),
            Command::Home => Some(Question::HomeLocation),
            Command::Help => None,
        }
    }
}

/// What an update asks the bot to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    Command {
        command: Command,
        argument: Option<String>,
    },
    /// Inline button press carrying its callback data.
    Callback(String),
    /// Free text, including unknown commands.
    Text(String),
    Unsupported,
}

impl Interaction {
    pub fn classify(update: &Update) -> Self {
        if let Some(query) = &update.callback_query {
            return match &query.data {
                Some(data) => Interaction::Callback(data.clone()),
                None => Interaction::Unsupported,
            };
        }

        match update.message.as_ref().and_then(|m| m.text.as_deref()) {
            Some(text) => parse_text(text),
            None => Interaction::Unsupported,
        }
    }
}

fn parse_text(text: &str) -> Interaction {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Interaction::Text(text.to_string());
    };

    let (head, argument) = match rest.split_once(char::is_whitespace) {
        Some((head, argument)) => (head, argument.trim()),
        None => (rest, ""),
    };
    // Commands in groups arrive as `/daily@my_bot`.
    let name = head.split('@').next().unwrap_or(head);

    match Command::from_name(name) {
        Some(command) => Interaction::Command {
            command,
            argument: (!argument.is_empty()).then(|| argument.to_string()),
        },
        None => Interaction::Text(text.to_string()),
    }
}

/// Which forecast a report shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Daily,
    Hourly,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Daily => "daily",
            ReportKind::Hourly => "hourly",
        }
    }

    /// Callback data asking for this report at the given coordinates.
    pub fn callback_data(&self, latitude: f64, longitude: f64) -> String {
        format!("{}:{:.6},{:.6}", self.as_str(), latitude, longitude)
    }
}

/// Parse `hourly:<lat>,<lon>` or `daily:<lat>,<lon>`.
pub fn parse_callback(data: &str) -> Result<(ReportKind, f64, f64)> {
    let invalid = || BotError::InvalidCallback(data.to_string());

    let (kind, coordinates) = data.split_once(':').ok_or_else(invalid)?;
    let kind = match kind {
        "daily" => ReportKind::Daily,
        "hourly" => ReportKind::Hourly,
        _ => return Err(invalid()),
    };

    let (latitude, longitude) = coordinates.split_once(',').ok_or_else(invalid)?;
    let latitude: f64 = latitude.trim().parse().map_err(|_| invalid())?;
    let longitude: f64 = longitude.trim().parse().map_err(|_| invalid())?;
    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(invalid());
    }

    Ok((kind, latitude, longitude))
}

/// Routes interactions to replies.
pub struct Router {
    conversations: Arc<dyn ConversationStore>,
    homes: Arc<dyn HomeStore>,
    places: Arc<dyn PlaceResolver>,
    forecasts: Arc<dyn ForecastSource>,
    zone: Tz,
    call_timeout: Duration,
}

impl Router {
    /// Create a router rendering times in UTC with the default call timeout.
    pub fn new(
        conversations: Arc<dyn ConversationStore>,
        homes: Arc<dyn HomeStore>,
        places: Arc<dyn PlaceResolver>,
        forecasts: Arc<dyn ForecastSource>,
    ) -> Self {
        Self {
            conversations,
            homes,
            places,
            forecasts,
            zone: Tz::UTC,
            call_timeout: weather::config::DEFAULT_TIMEOUT,
        }
    }

    /// Time zone used to render local dates and times.
    pub fn with_zone(mut self, zone: Tz) -> Self {
        self.zone = zone;
        self
    }

    /// Upper bound for each geocoding or forecast call.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Handle a webhook update and build the inline reply.
    ///
    /// Returns `None` when the update has no chat to answer in.
    pub async fn handle_update(&self, update: &Update) -> Option<WebhookReply> {
        let chat_id = update.chat_id()?;

        let text = match update.sender() {
            Some(user) => self.reply(user, Interaction::classify(update)).await,
            None => messages::UNSUPPORTED_INTERACTION.to_string(),
        };

        Some(WebhookReply::send_message(chat_id, text))
    }

    /// Produce the reply for `interaction` sent by `user`.
    ///
    /// Never fails: errors are logged and mapped to one of the generic
    /// replies.
    #[instrument(skip(self, user, interaction), fields(user_id = user.id))]
    pub async fn reply(&self, user: &User, interaction: Interaction) -> String {
        let chat_id = user.id.to_string();

        match interaction {
            Interaction::Command {
                command: Command::Help,
                ..
            } => messages::help(&user.first_name),
            Interaction::Command {
                command,
                argument: Some(argument),
            } => {
                self.abandon_pending(&chat_id).await;
                self.direct(user, command, &argument)
                    .await
                    .unwrap_or_else(|e| failure_reply(&e))
            }
            Interaction::Command {
                command,
                argument: None,
            } => self.ask(user, command).await,
            Interaction::Callback(data) => self
                .callback(&data)
                .await
                .unwrap_or_else(|e| failure_reply(&e)),
            Interaction::Text(text) => self.answer(user, &chat_id, &text).await,
            Interaction::Unsupported => messages::UNSUPPORTED_INTERACTION.to_string(),
        }
    }

    async fn abandon_pending(&self, chat_id: &str) {
        match self.conversations.mark_answered(chat_id).await {
            Ok(true) => debug!(chat_id, "Abandoned pending question"),
            Ok(false) => {}
            Err(e) => warn!(chat_id, error = %e, "Failed to abandon pending question"),
        }
    }

    async fn direct(&self, user: &User, command: Command, argument: &str) -> Result<String> {
        match command {
            Command::Daily => self.report_for(argument, ReportKind::Daily).await,
            Command::Hourly => self.report_for(argument, ReportKind::Hourly).await,
            Command::Home => self.save_home(user.id, argument).await,
            Command::Help => Ok(messages::help(&user.first_name)),
        }
    }

    async fn ask(&self, user: &User, command: Command) -> String {
        let Some(question) = command.question() else {
            return messages::help(&user.first_name);
        };
        let chat_id = user.id.to_string();

        if let Err(e) = self.conversations.add_question(&chat_id, question).await {
            error!(chat_id = %chat_id, error = %e, "Failed to record question");
            return messages::UNEXPECTED_ERROR.to_string();
        }
        debug!(chat_id = %chat_id, question = %question, "Question recorded");

        match question {
            Question::DailyLocation => messages::DAILY_LOCATION_QUESTION.to_string(),
            Question::HourlyLocation => messages::HOURLY_LOCATION_QUESTION.to_string(),
            Question::HomeLocation => match self.homes.get_home(user.id).await {
                Ok(Some(home)) => messages::current_home(&home.name),
                Ok(None) => messages::HOME_QUESTION.to_string(),
                Err(e) => {
                    warn!(user_id = user.id, error = %e, "Failed to read current home");
                    messages::HOME_QUESTION.to_string()
                }
            },
        }
    }

    async fn answer(&self, user: &User, chat_id: &str, text: &str) -> String {
        let state = match self.conversations.find(chat_id).await {
            Ok(state) => state,
            Err(e) => {
                error!(chat_id, error = %e, "Failed to read conversation state");
                return messages::UNEXPECTED_ERROR.to_string();
            }
        };

        let Some(question) = state.and_then(|s| s.pending()) else {
            return messages::UNKNOWN_TEXT.to_string();
        };

        let result = match question {
            Question::DailyLocation => self.report_for(text, ReportKind::Daily).await,
            Question::HourlyLocation => self.report_for(text, ReportKind::Hourly).await,
            Question::HomeLocation => self.save_home(user.id, text).await,
        };

        match result {
            Ok(reply) => {
                if let Err(e) = self.conversations.mark_answered(chat_id).await {
                    warn!(chat_id, error = %e, "Failed to mark question answered");
                }
                reply
            }
            // The question stays pending so the user can retry.
            Err(e) => failure_reply(&e),
        }
    }

    async fn callback(&self, data: &str) -> Result<String> {
        let (kind, latitude, longitude) = parse_callback(data)?;
        let place = with_deadline(
            self.call_timeout,
            "reverse geocode",
            self.places.reverse_geocode(latitude, longitude),
        )
        .await?;
        self.report(&place.name, latitude, longitude, kind).await
    }

    async fn report_for(&self, name: &str, kind: ReportKind) -> Result<String> {
        let place =
            with_deadline(self.call_timeout, "geocode", self.places.geocode(name.trim())).await?;
        self.report(&place.name, place.latitude, place.longitude, kind).await
    }

    async fn report(
        &self,
        name: &str,
        latitude: f64,
        longitude: f64,
        kind: ReportKind,
    ) -> Result<String> {
        match kind {
            ReportKind::Daily => {
                let forecasts = with_deadline(
                    self.call_timeout,
                    "daily forecast",
                    self.forecasts.daily_forecast(latitude, longitude),
                )
                .await?;
                Ok(forecast_table(
                    name,
                    &forecasts,
                    RenderOptions::DAILY,
                    &self.zone,
                ))
            }
            ReportKind::Hourly => {
                let forecasts = with_deadline(
                    self.call_timeout,
                    "hourly forecast",
                    self.forecasts.hourly_forecast(latitude, longitude),
                )
                .await?;
                let forecasts = hourly_window(forecasts);
                Ok(forecast_table(
                    name,
                    &forecasts,
                    RenderOptions::HOURLY,
                    &self.zone,
                ))
            }
        }
    }

    async fn save_home(&self, user_id: i64, name: &str) -> Result<String> {
        let location = home::set_home(
            self.homes.as_ref(),
            self.places.as_ref(),
            user_id,
            name,
            self.call_timeout,
        )
        .await?;
        Ok(messages::home_set(&location.name))
    }
}

/// Map an error to the generic reply shown to the user.
fn failure_reply(e: &BotError) -> String {
    match e {
        BotError::Weather(_) | BotError::Timeout { .. } => {
            warn!(error = %e, "Could not build report");
            messages::UNABLE_TO_GET_REPORT.to_string()
        }
        _ => {
            error!(error = %e, "Interaction failed");
            messages::UNEXPECTED_ERROR.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use telegram::{CallbackQuery, Chat, Message};

    fn message(text: &str) -> Update {
        Update {
            update_id: 1,
            message: Some(Message {
                message_id: 1,
                from: Some(User {
                    id: 42,
                    first_name: "Ada".to_string(),
                    ..User::default()
                }),
                chat: Chat {
                    id: 42,
                    kind: "private".to_string(),
                },
                date: 0,
                text: Some(text.to_string()),
            }),
            callback_query: None,
        }
    }

    #[test]
    fn test_classify_commands() {
        assert_eq!(
            Interaction::classify(&message("/daily")),
            Interaction::Command {
                command: Command::Daily,
                argument: None
            }
        );
        assert_eq!(
            Interaction::classify(&message("/hourly  New York ")),
            Interaction::Command {
                command: Command::Hourly,
                argument: Some("New York".to_string())
            }
        );
        assert_eq!(
            Interaction::classify(&message("/home@weathry_bot Madrid")),
            Interaction::Command {
                command: Command::Home,
                argument: Some("Madrid".to_string())
            }
        );
        assert_eq!(
            Interaction::classify(&message("/start")),
            Interaction::Command {
                command: Command::Help,
                argument: None
            }
        );
    }

    #[test]
    fn test_classify_text() {
        assert_eq!(
            Interaction::classify(&message("Madrid")),
            Interaction::Text("Madrid".to_string())
        );
        assert_eq!(
            Interaction::classify(&message("/weather Madrid")),
            Interaction::Text("/weather Madrid".to_string())
        );
    }

    #[test]
    fn test_classify_callback_and_unsupported() {
        let mut update = Update {
            update_id: 2,
            message: None,
            callback_query: Some(CallbackQuery {
                id: "q".to_string(),
                from: User::default(),
                message: None,
                data: Some("daily:1.0,2.0".to_string()),
            }),
        };
        assert_eq!(
            Interaction::classify(&update),
            Interaction::Callback("daily:1.0,2.0".to_string())
        );

        update.callback_query = None;
        assert_eq!(Interaction::classify(&update), Interaction::Unsupported);

        let mut photo = message("");
        if let Some(m) = photo.message.as_mut() {
            m.text = None;
        }
        assert_eq!(Interaction::classify(&photo), Interaction::Unsupported);
    }

    #[test]
    fn test_parse_callback() {
        let (kind, lat, lon) = parse_callback("hourly:40.416800,-3.703800").unwrap();
        assert_eq!(kind, ReportKind::Hourly);
        assert_eq!(lat, 40.4168);
        assert_eq!(lon, -3.7038);

        assert!(parse_callback("weekly:1,2").is_err());
        assert!(parse_callback("daily:1").is_err());
        assert!(parse_callback("daily:a,b").is_err());
        assert!(parse_callback("daily").is_err());
        assert!(parse_callback("daily:NaN,1").is_err());
    }

    #[test]
    fn test_callback_data_round_trips() {
        let data = ReportKind::Daily.callback_data(40.4168, -3.7038);
        assert_eq!(data, "daily:40.416800,-3.703800");
        assert_eq!(parse_callback(&data).unwrap().0, ReportKind::Daily);
    }
}
