//! Telegram webhook endpoint.
//!
//! The reply is returned inline as a `sendMessage` method call, so a
//! successful update costs a single HTTP round trip.

use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use telegram::{Update, WebhookReply};
use tracing::{debug, warn};
use weather_bot::messages;

use crate::error::Result;
use crate::state::AppState;

/// Handle one update.
pub async fn telegram_webhook(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let update: Update = serde_json::from_slice(&body)?;
    debug!(update_id = update.update_id, "Update received");

    if let Some(user) = update.sender() {
        if !state.is_authorised(user) {
            warn!(
                user_id = user.id,
                username = user.username.as_deref().unwrap_or(""),
                "Unauthorised user"
            );
            return Ok(match update.chat_id() {
                Some(chat_id) => {
                    let reply = WebhookReply::send_message(chat_id, messages::NOT_AUTHORISED);
                    Json(reply).into_response()
                }
                None => unsupported(),
            });
        }

        let tracker = state.tracker.clone();
        let user = user.clone();
        tokio::spawn(async move {
            if let Err(e) = tracker.track(&user).await {
                warn!(user_id = user.id, error = %e, "Failed to track user");
            }
        });
    }

    Ok(match state.router.handle_update(&update).await {
        Some(reply) => Json(reply).into_response(),
        None => unsupported(),
    })
}

fn unsupported() -> Response {
    Json(serde_json::json!({
        "message": messages::UNSUPPORTED_INTERACTION
    }))
    .into_response()
}
