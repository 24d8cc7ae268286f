//! Route handlers for the webhook server.

pub mod health;
pub mod webhook;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ping", get(health::ping))
        .route("/telegram/webhook", post(webhook::telegram_webhook))
}
