//! User endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use database::{user, User};
use serde::Deserialize;
use tracing::info;

use crate::error::Result;
use crate::state::AppState;

/// Profile sent by the bot.
#[derive(Debug, Default, Deserialize)]
pub struct TrackUserRequest {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub language_code: Option<String>,
}

/// Record a user. Returns 201 the first time and 202 afterwards.
pub async fn track_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<TrackUserRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let record = User {
        chat_id: id.to_string(),
        username: request.username,
        first_name: request.first_name,
        last_name: request.last_name,
        language_code: request.language_code,
    };

    if user::ensure_user(state.db.pool(), &record).await? {
        info!(user_id = id, "New user");
        Ok((StatusCode::CREATED, Json(record)))
    } else {
        let existing = user::get_user(state.db.pool(), &record.chat_id).await?;
        Ok((StatusCode::ACCEPTED, Json(existing)))
    }
}

/// Look up a user.
pub async fn get_user(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<User>> {
    let user = user::get_user(state.db.pool(), &id.to_string()).await?;
    Ok(Json(user))
}
