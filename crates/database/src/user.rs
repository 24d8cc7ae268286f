//! User tracking operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::User;

/// Create a new user.
pub async fn create_user(pool: &SqlitePool, user: &User) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO users (chat_id, username, first_name, last_name, language_code)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.chat_id)
    .bind(&user.username)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.language_code)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "User",
                    id: user.chat_id.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(())
}

/// Create the user unless it already exists.
///
/// Returns `true` when a new row was inserted.
pub async fn ensure_user(pool: &SqlitePool, user: &User) -> Result<bool> {
    match create_user(pool, user).await {
        Ok(()) => Ok(true),
        Err(DatabaseError::AlreadyExists { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Get a user by chat ID.
pub async fn get_user(pool: &SqlitePool, chat_id: &str) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT chat_id, username, first_name, last_name, language_code
        FROM users
        WHERE chat_id = ?
        "#,
    )
    .bind(chat_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: chat_id.to_string(),
    })
}

/// Count total users.
pub async fn count_users(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM users
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
