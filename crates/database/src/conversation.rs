//! Conversation state operations.
//!
//! Each chat has at most one row. Asking a new question overwrites the
//! previous one and resets `answered`.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{ConversationRow, ConversationState, Question};

/// Record that `question` was asked in `chat_id`.
pub async fn add_question(pool: &SqlitePool, chat_id: &str, question: Question) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO conversation_states (chat_id, pending_question, answered)
        VALUES (?, ?, 0)
        ON CONFLICT(chat_id) DO UPDATE SET
            pending_question = excluded.pending_question,
            answered = 0,
            updated_at = datetime('now')
        "#,
    )
    .bind(chat_id)
    .bind(question.as_str())
    .execute(pool)
    .await?;

    tracing::debug!(chat_id = %chat_id, question = %question, "Question recorded");
    Ok(())
}

/// Mark the pending question of `chat_id` as answered.
///
/// Returns `true` if a pending question was closed. Calling this again, or
/// for a chat without a row, changes nothing and returns `false`.
pub async fn mark_question_answered(pool: &SqlitePool, chat_id: &str) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE conversation_states
        SET answered = 1, updated_at = datetime('now')
        WHERE chat_id = ? AND answered = 0
        "#,
    )
    .bind(chat_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Find the conversation state for `chat_id`.
pub async fn find_conversation(
    pool: &SqlitePool,
    chat_id: &str,
) -> Result<Option<ConversationState>> {
    let row = sqlx::query_as::<_, ConversationRow>(
        r#"
        SELECT chat_id, pending_question, answered, updated_at
        FROM conversation_states
        WHERE chat_id = ?
        "#,
    )
    .bind(chat_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(ConversationState::from))
}
