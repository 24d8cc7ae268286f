//! Route handlers for the users service.

pub mod health;
pub mod users;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ping", get(health::ping))
        .route("/users/:id", get(users::get_user).put(users::track_user))
}
