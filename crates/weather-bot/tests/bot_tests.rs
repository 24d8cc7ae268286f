//! Integration tests for weather-bot.
//!
//! Everything runs against an in-memory SQLite store and the static
//! providers from `weather::mock`, so no network access is needed:
//!   cargo test -p weather-bot --test bot_tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use database::{ConversationState, Database, DatabaseError, Question};
use telegram::{CallbackQuery, Chat, Message, Update, User};
use tokio::sync::watch;
use weather::mock::{sample, StaticForecastSource, StaticPlaceResolver};
use weather::{Condition, Forecast};
use weather_bot::messages;
use weather_bot::{
    AlertConfig, Command, ConversationStore, HomeStore, Interaction, MessageSender, Pinger,
    PingerConfig, QuickReply, Router,
};

const USER_ID: i64 = 42;

// Mon 13 Nov 2023 12:00:00 UTC
const MONDAY_NOON: i64 = 1_699_876_800;
const HOUR: i64 = 3600;

fn user() -> User {
    User {
        id: USER_ID,
        first_name: "Ada".to_string(),
        username: Some("ada".to_string()),
        ..User::default()
    }
}

fn command(command: Command, argument: Option<&str>) -> Interaction {
    Interaction::Command {
        command,
        argument: argument.map(str::to_string),
    }
}

fn text(text: &str) -> Interaction {
    Interaction::Text(text.to_string())
}

fn week() -> Vec<Forecast> {
    (0..7)
        .map(|day| sample(MONDAY_NOON + day * 24 * HOUR, Condition::Clouds, 11.0, 19.0))
        .collect()
}

fn next_hours() -> Vec<Forecast> {
    (0..16)
        .map(|slot| sample(MONDAY_NOON + slot * 3 * HOUR, Condition::Clear, 14.0, 16.0))
        .collect()
}

fn places() -> StaticPlaceResolver {
    StaticPlaceResolver::new()
        .with_place("Madrid", 40.4168, -3.7038, "Spain")
        .with_place("Lisbon", 38.7223, -9.1393, "Portugal")
}

async fn test_db() -> Arc<Database> {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    db.migrate().await.unwrap();
    Arc::new(db)
}

struct Harness {
    db: Arc<Database>,
    forecasts: Arc<StaticForecastSource>,
    router: Router,
}

async fn harness() -> Harness {
    let db = test_db().await;
    let forecasts = Arc::new(
        StaticForecastSource::new()
            .with_daily(week())
            .with_hourly(next_hours()),
    );
    let router = Router::new(db.clone(), db.clone(), Arc::new(places()), forecasts.clone());

    Harness {
        db,
        forecasts,
        router,
    }
}

async fn state(db: &Database) -> Option<ConversationState> {
    db.find(&USER_ID.to_string()).await.unwrap()
}

// ============================================================================
// Conversation state machine
// ============================================================================

mod conversation_tests {
    use super::*;

    #[tokio::test]
    async fn test_daily_question_then_answer() {
        let h = harness().await;

        let prompt = h.router.reply(&user(), command(Command::Daily, None)).await;
        assert_eq!(prompt, messages::DAILY_LOCATION_QUESTION);
        assert!(prompt.contains("this week\\'s weather"));

        let pending = state(&h.db).await.unwrap();
        assert_eq!(pending.pending(), Some(Question::DailyLocation));
        assert!(!pending.answered);

        let report = h.router.reply(&user(), text("Madrid")).await;
        assert!(report.starts_with("```\nMadrid  \n"));
        assert!(report.contains("| Date   | Report      |"));
        assert!(report.contains("| Mon 13 | clouds      |"));
        assert!(report.contains("11ºC - 19ºC"));

        let answered = state(&h.db).await.unwrap();
        assert!(answered.answered);
        assert_eq!(answered.pending(), None);
        assert_eq!(h.forecasts.calls(), 1);
    }

    #[tokio::test]
    async fn test_second_question_overwrites_first() {
        let h = harness().await;

        h.router.reply(&user(), command(Command::Daily, None)).await;
        let prompt = h.router.reply(&user(), command(Command::Hourly, None)).await;
        assert_eq!(prompt, messages::HOURLY_LOCATION_QUESTION);

        let pending = state(&h.db).await.unwrap();
        assert_eq!(pending.pending(), Some(Question::HourlyLocation));

        let report = h.router.reply(&user(), text("Madrid")).await;
        assert!(report.starts_with("```\nMon, 13 Nov 2023  \nMadrid  \n"));
        assert!(report.contains("| Time   | Report |"));
        assert_eq!(report.matches("h | clear  |").count(), 9);
    }

    #[tokio::test]
    async fn test_text_without_question() {
        let h = harness().await;

        let reply = h.router.reply(&user(), text("Madrid")).await;
        assert_eq!(reply, messages::UNKNOWN_TEXT);
        assert!(state(&h.db).await.is_none());
        assert_eq!(h.forecasts.calls(), 0);
    }

    #[tokio::test]
    async fn test_text_after_answer_is_not_understood() {
        let h = harness().await;

        h.router.reply(&user(), command(Command::Daily, None)).await;
        h.router.reply(&user(), text("Madrid")).await;

        let reply = h.router.reply(&user(), text("Lisbon")).await;
        assert_eq!(reply, messages::UNKNOWN_TEXT);
        assert_eq!(h.forecasts.calls(), 1);
    }

    #[tokio::test]
    async fn test_command_with_argument_abandons_question() {
        let h = harness().await;

        h.router.reply(&user(), command(Command::Daily, None)).await;
        let report = h
            .router
            .reply(&user(), command(Command::Hourly, Some("Lisbon")))
            .await;
        assert!(report.contains("Lisbon"));

        let after = state(&h.db).await.unwrap();
        assert!(after.answered);

        let reply = h.router.reply(&user(), text("Madrid")).await;
        assert_eq!(reply, messages::UNKNOWN_TEXT);
    }

    #[tokio::test]
    async fn test_unknown_place_keeps_question_pending() {
        let h = harness().await;

        h.router.reply(&user(), command(Command::Daily, None)).await;
        let reply = h.router.reply(&user(), text("Atlantis")).await;
        assert_eq!(reply, messages::UNABLE_TO_GET_REPORT);

        let pending = state(&h.db).await.unwrap();
        assert_eq!(pending.pending(), Some(Question::DailyLocation));

        let report = h.router.reply(&user(), text("Madrid")).await;
        assert!(report.starts_with("```\nMadrid"));
    }

    #[tokio::test]
    async fn test_help() {
        let h = harness().await;

        let reply = h.router.reply(&user(), command(Command::Help, None)).await;
        assert!(reply.starts_with("👋 Hi Ada\\!"));
        assert!(state(&h.db).await.is_none());
    }

    #[tokio::test]
    async fn test_unsupported() {
        let h = harness().await;

        let reply = h.router.reply(&user(), Interaction::Unsupported).await;
        assert_eq!(reply, messages::UNSUPPORTED_INTERACTION);
    }
}

// ============================================================================
// Home
// ============================================================================

mod home_tests {
    use super::*;

    #[tokio::test]
    async fn test_home_question_flow() {
        let h = harness().await;

        let prompt = h.router.reply(&user(), command(Command::Home, None)).await;
        assert_eq!(prompt, messages::HOME_QUESTION);

        let reply = h.router.reply(&user(), text("Madrid")).await;
        assert_eq!(reply, messages::home_set("Madrid"));

        let prompt = h.router.reply(&user(), command(Command::Home, None)).await;
        assert_eq!(prompt, messages::current_home("Madrid"));
    }

    #[tokio::test]
    async fn test_set_home_twice_keeps_one_home() {
        let h = harness().await;

        h.router
            .reply(&user(), command(Command::Home, Some("Madrid")))
            .await;
        let reply = h
            .router
            .reply(&user(), command(Command::Home, Some("Lisbon")))
            .await;
        assert_eq!(reply, messages::home_set("Lisbon"));

        let homes = h.db.list_homes().await.unwrap();
        assert_eq!(homes.len(), 1);
        assert_eq!(homes[0].user_id, USER_ID);
        assert_eq!(homes[0].location.name, "Lisbon");

        let home = h.db.get_home(USER_ID).await.unwrap().unwrap();
        assert_eq!(home.coordinates(), Some((38.7223, -9.1393)));
    }

    #[tokio::test]
    async fn test_unknown_home() {
        let h = harness().await;

        let reply = h
            .router
            .reply(&user(), command(Command::Home, Some("Atlantis")))
            .await;
        assert_eq!(reply, messages::UNABLE_TO_GET_REPORT);
        assert!(h.db.get_home(USER_ID).await.unwrap().is_none());
    }
}

// ============================================================================
// Callbacks and webhook replies
// ============================================================================

mod callback_tests {
    use super::*;

    #[tokio::test]
    async fn test_daily_callback() {
        let h = harness().await;

        let reply = h
            .router
            .reply(
                &user(),
                Interaction::Callback("daily:40.416800,-3.703800".to_string()),
            )
            .await;
        assert!(reply.starts_with("```\nMadrid, Spain  \n"));
        assert!(reply.contains("| Date "));
    }

    #[tokio::test]
    async fn test_malformed_callback() {
        let h = harness().await;

        let reply = h
            .router
            .reply(&user(), Interaction::Callback("weekly:north".to_string()))
            .await;
        assert_eq!(reply, messages::UNEXPECTED_ERROR);
    }

    #[tokio::test]
    async fn test_callback_provider_failure() {
        let db = test_db().await;
        let router = Router::new(
            db.clone(),
            db,
            Arc::new(places()),
            Arc::new(StaticForecastSource::failing()),
        );

        let reply = router
            .reply(
                &user(),
                Interaction::Callback("hourly:40.416800,-3.703800".to_string()),
            )
            .await;
        assert_eq!(reply, messages::UNABLE_TO_GET_REPORT);
    }

    #[tokio::test]
    async fn test_handle_update_builds_inline_reply() {
        let h = harness().await;
        let update = Update {
            update_id: 10,
            message: Some(Message {
                message_id: 5,
                from: Some(user()),
                chat: Chat {
                    id: 900,
                    kind: "private".to_string(),
                },
                date: 0,
                text: Some("/daily".to_string()),
            }),
            callback_query: None,
        };

        let reply = h.router.handle_update(&update).await.unwrap();
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["method"], "sendMessage");
        assert_eq!(json["chat_id"], 900);
        assert_eq!(json["parse_mode"], "MarkdownV2");
        assert_eq!(json["text"], messages::DAILY_LOCATION_QUESTION);
    }

    #[tokio::test]
    async fn test_handle_callback_update() {
        let h = harness().await;
        let update = Update {
            update_id: 11,
            message: None,
            callback_query: Some(CallbackQuery {
                id: "cb".to_string(),
                from: user(),
                message: None,
                data: Some("hourly:38.722300,-9.139300".to_string()),
            }),
        };

        let reply = h.router.handle_update(&update).await.unwrap();
        assert_eq!(reply.message.chat_id, USER_ID);
        assert!(reply.message.text.contains("Lisbon, Portugal"));
    }

    #[tokio::test]
    async fn test_handle_update_without_chat() {
        let h = harness().await;
        let update = Update {
            update_id: 12,
            ..Update::default()
        };

        assert!(h.router.handle_update(&update).await.is_none());
    }
}

// ============================================================================
// Store failures
// ============================================================================

mod store_failure_tests {
    use super::*;

    fn broken() -> DatabaseError {
        DatabaseError::NotFound {
            entity: "Conversation",
            id: "unavailable".to_string(),
        }
    }

    /// Conversation store whose reads fail.
    struct UnreadableConversations;

    #[async_trait]
    impl ConversationStore for UnreadableConversations {
        async fn add_question(&self, _chat_id: &str, _question: Question) -> database::Result<()> {
            Err(broken())
        }

        async fn mark_answered(&self, _chat_id: &str) -> database::Result<bool> {
            Err(broken())
        }

        async fn find(&self, _chat_id: &str) -> database::Result<Option<ConversationState>> {
            Err(broken())
        }
    }

    /// Conversation store that always has a daily question pending but
    /// cannot record answers.
    struct ReadOnlyConversations;

    #[async_trait]
    impl ConversationStore for ReadOnlyConversations {
        async fn add_question(&self, _chat_id: &str, _question: Question) -> database::Result<()> {
            Ok(())
        }

        async fn mark_answered(&self, _chat_id: &str) -> database::Result<bool> {
            Err(broken())
        }

        async fn find(&self, chat_id: &str) -> database::Result<Option<ConversationState>> {
            Ok(Some(ConversationState {
                chat_id: chat_id.to_string(),
                question: Some(Question::DailyLocation),
                answered: false,
                updated_at: String::new(),
            }))
        }
    }

    async fn router_with(conversations: Arc<dyn ConversationStore>) -> Router {
        let db = test_db().await;
        Router::new(
            conversations,
            db,
            Arc::new(places()),
            Arc::new(StaticForecastSource::new().with_daily(week())),
        )
    }

    #[tokio::test]
    async fn test_unreadable_state_is_unexpected_error() {
        let router = router_with(Arc::new(UnreadableConversations)).await;

        let reply = router.reply(&user(), text("Madrid")).await;
        assert_eq!(reply, messages::UNEXPECTED_ERROR);

        let reply = router.reply(&user(), command(Command::Daily, None)).await;
        assert_eq!(reply, messages::UNEXPECTED_ERROR);
    }

    #[tokio::test]
    async fn test_explicit_argument_survives_store_failure() {
        let router = router_with(Arc::new(UnreadableConversations)).await;

        let reply = router
            .reply(&user(), command(Command::Daily, Some("Madrid")))
            .await;
        assert!(reply.starts_with("```\nMadrid  \n"));
    }

    #[tokio::test]
    async fn test_failed_bookkeeping_still_replies() {
        let router = router_with(Arc::new(ReadOnlyConversations)).await;

        let reply = router.reply(&user(), text("Madrid")).await;
        assert!(reply.starts_with("```\nMadrid  \n"));
    }
}

// ============================================================================
// Pinger
// ============================================================================

mod pinger_tests {
    use super::*;

    /// Keeps every proactive message in memory.
    #[derive(Default)]
    struct Outbox(Mutex<Vec<(i64, String, Vec<QuickReply>)>>);

    #[async_trait]
    impl MessageSender for Outbox {
        async fn send_message(
            &self,
            user_id: i64,
            text: &str,
            quick_replies: &[QuickReply],
        ) -> weather_bot::Result<()> {
            self.0
                .lock()
                .unwrap()
                .push((user_id, text.to_string(), quick_replies.to_vec()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_rain_tomorrow_sends_one_alert() {
        let db = test_db().await;
        let places = places();
        weather_bot::set_home(
            db.as_ref(),
            &places,
            USER_ID,
            "Madrid",
            std::time::Duration::from_secs(5),
        )
        .await
        .unwrap();

        let now = Utc.with_ymd_and_hms(2023, 11, 13, 8, 0, 0).unwrap();
        let tomorrow_14h = Utc.with_ymd_and_hms(2023, 11, 14, 14, 0, 0).unwrap();
        let forecasts = StaticForecastSource::new().with_hourly(vec![
            sample(now.timestamp() + 4 * HOUR, Condition::Clouds, 15.0, 20.0),
            sample(tomorrow_14h.timestamp(), Condition::Rain, 15.0, 20.0),
            sample(tomorrow_14h.timestamp() + 3 * HOUR, Condition::Clear, 15.0, 20.0),
        ]);

        let pinger = Pinger::new(
            db,
            Arc::new(forecasts),
            Outbox::default(),
            AlertConfig::default(),
            PingerConfig::default(),
        );

        let (_tx, mut rx) = watch::channel(false);
        let report = pinger.run_pass(now, &mut rx).await;
        assert_eq!(report.sent, 1);

        let sent = pinger.sender().0.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        let (user_id, text, quick_replies) = &sent[0];
        assert_eq!(*user_id, USER_ID);
        assert_eq!(text, "Hey! I'm expecting rain next Tue 14 at around 14:00h.");
        assert_eq!(quick_replies.len(), 2);
        assert_eq!(quick_replies[1].data, "daily:40.416800,-3.703800");
    }

    #[tokio::test]
    async fn test_alert_time_follows_summer_time() {
        let db = test_db().await;
        let places = places();
        weather_bot::set_home(
            db.as_ref(),
            &places,
            USER_ID,
            "Madrid",
            std::time::Duration::from_secs(5),
        )
        .await
        .unwrap();

        // 06:00 UTC is 08:00 in Madrid on Mon 15 Jul 2024.
        let now = Utc.with_ymd_and_hms(2024, 7, 15, 6, 0, 0).unwrap();
        let rain = Utc.with_ymd_and_hms(2024, 7, 16, 12, 0, 0).unwrap();
        let forecasts = StaticForecastSource::new().with_hourly(vec![
            sample(now.timestamp() + 3 * HOUR, Condition::Clear, 20.0, 28.0),
            sample(rain.timestamp(), Condition::Rain, 20.0, 25.0),
            sample(rain.timestamp() + 3 * HOUR, Condition::Clear, 20.0, 28.0),
        ]);

        let pinger = Pinger::new(
            db,
            Arc::new(forecasts),
            Outbox::default(),
            AlertConfig::default(),
            PingerConfig {
                zone: chrono_tz::Europe::Madrid,
                ..PingerConfig::default()
            },
        );
        assert!(pinger.is_due(now, None));

        let (_tx, mut rx) = watch::channel(false);
        assert_eq!(pinger.run_pass(now, &mut rx).await.sent, 1);

        let sent = pinger.sender().0.lock().unwrap().clone();
        assert_eq!(sent[0].1, "Hey! I'm expecting rain next Tue 16 at around 14:00h.");
    }

    #[tokio::test]
    async fn test_alert_buttons_route_back_to_reports() {
        let h = harness().await;
        let replies = weather_bot::quick_replies(40.4168, -3.7038);

        for reply in &replies {
            let text = h
                .router
                .reply(&user(), Interaction::Callback(reply.data.clone()))
                .await;
            assert!(text.starts_with("```\n"));
            assert!(text.contains("Madrid, Spain"));
        }
    }
}
