//! SQLite implementation of the conversation store.

use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use super::models::{MessageRow, SessionRow, now_timestamp};
use super::schema::SCHEMA;
use crate::config::StoreConfig;
use crate::domain::{JsonBlob, Message, NewMessage, Session, SessionId};
use crate::error::GatewayError;

/// SQLite-backed store for sessions, messages, and analytics events.
///
/// Cheap to clone: clones share the same connection pool.
///
/// Lookups return `Ok(None)` for absent rows. Writes referencing an unknown
/// session fail with [`GatewayError::ConstraintViolation`]; every other
/// database failure is [`GatewayError::StorageUnavailable`].
#[derive(Debug, Clone)]
pub struct ConversationStore {
    pool: SqlitePool,
}

impl ConversationStore {
    /// Wraps an existing pool. The caller is responsible for enabling
    /// foreign keys on its connections and for calling
    /// [`init_schema`](Self::init_schema).
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if needed) the database described by `config` and
    /// initializes the schema.
    ///
    /// Connections use WAL journaling, enforce foreign keys, and wait up to
    /// five seconds on a locked database.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::StorageUnavailable`] if the parent directory
    /// cannot be created, the pool cannot connect, or schema creation fails.
    pub async fn connect(config: &StoreConfig) -> Result<Self, GatewayError> {
        if let Some(parent) = config.database_path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                GatewayError::StorageUnavailable(format!(
                    "cannot create {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&config.database_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(storage_error)?;

        let store = Self::new(pool);
        store.init_schema().await?;

        tracing::info!(path = %config.database_path.display(), "conversation store ready");
        Ok(store)
    }

    /// Creates the tables and indexes if they do not exist. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::StorageUnavailable`] on database failure.
    pub async fn init_schema(&self) -> Result<(), GatewayError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    /// Creates a new `active` session and returns its id.
    ///
    /// `created_at` and `updated_at` are set to the same instant.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::StorageUnavailable`] on database failure.
    pub async fn create_session(
        &self,
        metadata: Option<&JsonBlob>,
    ) -> Result<SessionId, GatewayError> {
        let session_id = SessionId::new();
        let now = now_timestamp();

        sqlx::query(
            "INSERT INTO sessions (id, created_at, updated_at, metadata, status) \
             VALUES (?, ?, ?, ?, 'active')",
        )
        .bind(session_id.to_string())
        .bind(&now)
        .bind(&now)
        .bind(metadata.map(JsonBlob::as_str))
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        tracing::debug!(%session_id, "session created");
        Ok(session_id)
    }

    /// Fetches a session by id. Returns `Ok(None)` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::StorageUnavailable`] on database failure or a
    /// corrupt row.
    pub async fn get_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<Session>, GatewayError> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT id, created_at, updated_at, metadata, status FROM sessions WHERE id = ?",
        )
        .bind(session_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        row.map(SessionRow::into_session).transpose()
    }

    /// Lists `active` sessions, most recently updated first.
    ///
    /// `limit` and `offset` are applied as given; validation is the caller's
    /// job. Sessions sharing an `updated_at` are ordered newest insert first.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::StorageUnavailable`] on database failure or a
    /// corrupt row.
    pub async fn list_sessions(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Session>, GatewayError> {
        let rows = sqlx::query_as::<_, SessionRow>(
            "SELECT id, created_at, updated_at, metadata, status FROM sessions \
             WHERE status = 'active' ORDER BY updated_at DESC, rowid DESC LIMIT ? OFFSET ?",
        )
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.into_iter().map(SessionRow::into_session).collect()
    }

    /// Marks a session as `ended` and refreshes `updated_at`.
    ///
    /// Idempotent: ending an already-ended or unknown session is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::StorageUnavailable`] on database failure.
    pub async fn end_session(&self, session_id: &SessionId) -> Result<(), GatewayError> {
        let result =
            sqlx::query("UPDATE sessions SET status = 'ended', updated_at = ? WHERE id = ?")
                .bind(now_timestamp())
                .bind(session_id.to_string())
                .execute(&self.pool)
                .await
                .map_err(storage_error)?;

        tracing::debug!(%session_id, rows = result.rows_affected(), "session ended");
        Ok(())
    }

    /// Appends a message and refreshes the session's `updated_at`.
    ///
    /// Both statements run in one transaction: either the message is stored
    /// and the session touched, or neither happens.
    ///
    /// `created_at` never goes below the newest message already stored for
    /// the session, so replay order survives a wall clock stepping back.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConstraintViolation`] if the session does not
    /// exist, or [`GatewayError::StorageUnavailable`] on database failure.
    pub async fn save_message(
        &self,
        session_id: &SessionId,
        message: &NewMessage,
    ) -> Result<i64, GatewayError> {
        let now = now_timestamp();
        let session_key = session_id.to_string();

        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let (message_id, created_at) = sqlx::query_as::<_, (i64, String)>(
            "INSERT INTO messages (session_id, role, content, tool_calls, created_at, token_count) \
             VALUES (?, ?, ?, ?, \
                     MAX(?, COALESCE((SELECT MAX(created_at) FROM messages WHERE session_id = ?), '')), \
                     ?) \
             RETURNING id, created_at",
        )
        .bind(&session_key)
        .bind(message.role.as_str())
        .bind(&message.content)
        .bind(message.tool_calls.as_ref().map(JsonBlob::as_str))
        .bind(&now)
        .bind(&session_key)
        .bind(message.token_count.map(i64::from))
        .fetch_one(&mut *tx)
        .await
        .map_err(storage_error)?;

        sqlx::query("UPDATE sessions SET updated_at = ? WHERE id = ?")
            .bind(&created_at)
            .bind(&session_key)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;

        tx.commit().await.map_err(storage_error)?;

        tracing::debug!(%session_id, message_id, role = %message.role, "message saved");
        Ok(message_id)
    }

    /// Returns all messages of a session in replay order: ascending
    /// `created_at`, ties broken by id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::StorageUnavailable`] on database failure or a
    /// corrupt row.
    pub async fn get_messages(&self, session_id: &SessionId) -> Result<Vec<Message>, GatewayError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            "SELECT id, session_id, role, content, tool_calls, created_at, token_count \
             FROM messages WHERE session_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(session_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.into_iter().map(MessageRow::into_message).collect()
    }

    /// Counts the messages stored for a session.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::StorageUnavailable`] on database failure.
    pub async fn count_messages(&self, session_id: &SessionId) -> Result<u64, GatewayError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM messages WHERE session_id = ?")
                .bind(session_id.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(storage_error)?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Appends an analytics event. There is no read path.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConstraintViolation`] if the session does not
    /// exist, or [`GatewayError::StorageUnavailable`] on database failure.
    pub async fn log_event(
        &self,
        session_id: &SessionId,
        event_type: &str,
        event_data: Option<&JsonBlob>,
    ) -> Result<(), GatewayError> {
        sqlx::query(
            "INSERT INTO events (session_id, event_type, event_data, created_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(session_id.to_string())
        .bind(event_type)
        .bind(event_data.map(JsonBlob::as_str))
        .bind(now_timestamp())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        tracing::debug!(%session_id, event_type, "event logged");
        Ok(())
    }

    /// Physically deletes a session. Its messages and events are removed in
    /// the same statement through `ON DELETE CASCADE`.
    ///
    /// Returns `true` if a session row was deleted.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::StorageUnavailable`] on database failure.
    pub async fn purge_session(&self, session_id: &SessionId) -> Result<bool, GatewayError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(session_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        let purged = result.rows_affected() > 0;
        if purged {
            tracing::info!(%session_id, "session purged");
        }
        Ok(purged)
    }

    /// Closes every pooled connection. Further calls fail with
    /// [`GatewayError::StorageUnavailable`].
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Maps a `sqlx` error onto the store's failure kinds.
fn storage_error(err: sqlx::Error) -> GatewayError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_foreign_key_violation()
    {
        return GatewayError::ConstraintViolation(db_err.message().to_string());
    }
    GatewayError::StorageUnavailable(err.to_string())
}
