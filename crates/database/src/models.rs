//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The follow-up question the bot is waiting on for a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Question {
    /// Waiting for the place to check this week's weather for.
    DailyLocation,
    /// Waiting for the place to check today's hourly weather for.
    HourlyLocation,
    /// Waiting for the place to save as home.
    HomeLocation,
}

impl Question {
    /// Tag stored in the `pending_question` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Question::DailyLocation => "AWAITING_DAILY_WEATHER_CITY",
            Question::HourlyLocation => "AWAITING_HOURLY_WEATHER_CITY",
            Question::HomeLocation => "AWAITING_HOME",
        }
    }

    /// Parse a stored tag. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "AWAITING_DAILY_WEATHER_CITY" => Some(Question::DailyLocation),
            "AWAITING_HOURLY_WEATHER_CITY" => Some(Question::HourlyLocation),
            "AWAITING_HOME" => Some(Question::HomeLocation),
            _ => None,
        }
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversation state for a single chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    /// Chat identity (Telegram user id as a string).
    pub chat_id: String,
    /// Question last asked, `None` when nothing is pending or the tag is unknown.
    pub question: Option<Question>,
    /// Whether the pending question has been answered.
    pub answered: bool,
    /// Last update timestamp.
    pub updated_at: String,
}

impl ConversationState {
    /// The question still waiting for an answer, if any.
    pub fn pending(&self) -> Option<Question> {
        if self.answered {
            None
        } else {
            self.question
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct ConversationRow {
    pub chat_id: String,
    pub pending_question: Option<String>,
    pub answered: bool,
    pub updated_at: String,
}

impl From<ConversationRow> for ConversationState {
    fn from(row: ConversationRow) -> Self {
        Self {
            chat_id: row.chat_id,
            question: row.pending_question.as_deref().and_then(Question::from_tag),
            answered: row.answered,
            updated_at: row.updated_at,
        }
    }
}

/// A place known by name, optionally hydrated with coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Location {
    /// Name as typed by the user (primary key).
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub country: Option<String>,
    pub country_code: Option<String>,
}

impl Location {
    /// A bare location with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latitude: None,
            longitude: None,
            country: None,
            country_code: None,
        }
    }

    /// Coordinates, if both are set and neither is the zero sentinel.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat != 0.0 && lon != 0.0 => Some((lat, lon)),
            _ => None,
        }
    }

    /// Whether the location still needs geocoding.
    pub fn needs_hydration(&self) -> bool {
        self.coordinates().is_none()
    }
}

/// A user's home location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct HomeLocation {
    /// Telegram user id.
    pub user_id: i64,
    #[sqlx(flatten)]
    pub location: Location,
}

/// A user that has talked to the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Telegram chat id.
    pub chat_id: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub language_code: Option<String>,
}
