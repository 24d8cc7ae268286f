//! Application state shared across handlers.

use std::sync::Arc;

use telegram::User;
use weather_bot::{Router, UserTracker};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Interaction router.
    pub router: Arc<Router>,
    /// Users service client.
    pub tracker: Arc<dyn UserTracker>,
    /// Lowercased usernames allowed to use the bot. Empty allows everyone.
    pub authorised_users: Arc<Vec<String>>,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        router: Router,
        tracker: Arc<dyn UserTracker>,
        authorised_users: Vec<String>,
    ) -> Self {
        Self {
            router: Arc::new(router),
            tracker,
            authorised_users: Arc::new(authorised_users),
        }
    }

    /// Whether `user` may talk to the bot.
    pub fn is_authorised(&self, user: &User) -> bool {
        if self.authorised_users.is_empty() {
            return true;
        }

        user.username
            .as_deref()
            .map(|name| name.to_lowercase())
            .is_some_and(|name| self.authorised_users.contains(&name))
    }
}
