//! Store seams used by the router and the pinger.
//!
//! Both traits are implemented for [`Database`]; tests can swap in their
//! own implementations to simulate storage failures.

use async_trait::async_trait;
use database::{
    conversation, location, ConversationState, Database, HomeLocation, Location, Question,
};

/// Per-chat conversation state.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Record `question` as the pending question of `chat_id`, replacing
    /// whatever was pending before.
    async fn add_question(&self, chat_id: &str, question: Question) -> database::Result<()>;

    /// Mark the pending question as answered. Returns `false` when nothing
    /// was pending.
    async fn mark_answered(&self, chat_id: &str) -> database::Result<bool>;

    /// Current state of `chat_id`, if it ever had a question.
    async fn find(&self, chat_id: &str) -> database::Result<Option<ConversationState>>;
}

/// Locations and per-user homes.
#[async_trait]
pub trait HomeStore: Send + Sync {
    async fn get_location(&self, name: &str) -> database::Result<Option<Location>>;

    async fn create_location(&self, name: &str) -> database::Result<Location>;

    async fn update_location(&self, location: &Location) -> database::Result<()>;

    async fn get_home(&self, user_id: i64) -> database::Result<Option<Location>>;

    /// Make `location` the only home of `user_id`.
    async fn set_home(&self, user_id: i64, location: &Location) -> database::Result<()>;

    async fn list_homes(&self) -> database::Result<Vec<HomeLocation>>;
}

#[async_trait]
impl ConversationStore for Database {
    async fn add_question(&self, chat_id: &str, question: Question) -> database::Result<()> {
        conversation::add_question(self.pool(), chat_id, question).await
    }

    async fn mark_answered(&self, chat_id: &str) -> database::Result<bool> {
        conversation::mark_question_answered(self.pool(), chat_id).await
    }

    async fn find(&self, chat_id: &str) -> database::Result<Option<ConversationState>> {
        conversation::find_conversation(self.pool(), chat_id).await
    }
}

#[async_trait]
impl HomeStore for Database {
    async fn get_location(&self, name: &str) -> database::Result<Option<Location>> {
        location::get_location(self.pool(), name).await
    }

    async fn create_location(&self, name: &str) -> database::Result<Location> {
        location::create_location(self.pool(), name).await
    }

    async fn update_location(&self, location: &Location) -> database::Result<()> {
        location::update_location(self.pool(), location).await
    }

    async fn get_home(&self, user_id: i64) -> database::Result<Option<Location>> {
        location::get_home(self.pool(), user_id).await
    }

    async fn set_home(&self, user_id: i64, location: &Location) -> database::Result<()> {
        location::set_home(self.pool(), user_id, &location.name).await
    }

    async fn list_homes(&self) -> database::Result<Vec<HomeLocation>> {
        location::list_homes(self.pool()).await
    }
}
