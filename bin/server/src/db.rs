//! PostgreSQL message store.
//!
//! Durable implementation of the conversation crate's `MessageStore`.
//! The `messages` table carries a `seq` sequence column; insertion order
//! within a dialog is resolved entirely by that column, with no
//! application-level locking.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parley_conversation::{Message, MessageStore, StoreError};
use parley_core::{DialogId, MessageId};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Repository for the append-only `messages` table.
#[derive(Clone)]
pub struct PgMessageStore {
    pool: PgPool,
}

#[derive(FromRow)]
struct MessageRow {
    id: Uuid,
    dialog_id: Uuid,
    text: String,
    participant_index: i32,
    created_at: DateTime<Utc>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Message {
            id: MessageId::from_uuid(row.id),
            dialog_id: DialogId::from_uuid(row.dialog_id),
            text: row.text,
            participant_index: row.participant_index,
            created_at: row.created_at,
        }
    }
}

impl PgMessageStore {
    /// Creates a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_sqlx_error(err: sqlx::Error, id: MessageId) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::DuplicateId { id }
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable {
                reason: err.to_string(),
            }
        }
        _ => StoreError::QueryFailed {
            reason: err.to_string(),
        },
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    async fn insert(&self, message: Message) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, dialog_id, text, participant_index, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(message.id.as_uuid())
        .bind(message.dialog_id.as_uuid())
        .bind(&message.text)
        .bind(message.participant_index)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, message.id))?;

        Ok(())
    }

    async fn list_by_dialog(&self, dialog_id: DialogId) -> Result<Vec<Message>, StoreError> {
        let rows: Vec<MessageRow> = sqlx::query_as(
            r#"
            SELECT id, dialog_id, text, participant_index, created_at
            FROM messages
            WHERE dialog_id = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(dialog_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed {
            reason: e.to_string(),
        })?;

        Ok(rows.into_iter().map(Message::from).collect())
    }
}
