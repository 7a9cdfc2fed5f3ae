//! Database row types and their mapping to domain records.
//!
//! Timestamps are stored as RFC 3339 UTC text with millisecond precision so
//! that lexicographic order in SQLite matches chronological order.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::{JsonBlob, Message, MessageRole, Session, SessionId, SessionStatus};
use crate::error::GatewayError;

/// A row from the `sessions` table.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SessionRow {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub metadata: Option<String>,
    pub status: String,
}

impl SessionRow {
    pub(crate) fn into_session(self) -> Result<Session, GatewayError> {
        let status: SessionStatus = self.status.parse().map_err(corrupt)?;
        Ok(Session {
            id: parse_session_id(&self.id)?,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
            metadata: parse_blob(self.metadata)?,
            status,
        })
    }
}

/// A row from the `messages` table.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct MessageRow {
    pub id: i64,
    pub session_id: String,
    pub role: String,
    pub content: String,
    pub tool_calls: Option<String>,
    pub created_at: String,
    pub token_count: Option<i64>,
}

impl MessageRow {
    pub(crate) fn into_message(self) -> Result<Message, GatewayError> {
        let token_count = self
            .token_count
            .map(u32::try_from)
            .transpose()
            .map_err(|e| corrupt(format!("invalid token_count: {e}")))?;

        Ok(Message {
            id: self.id,
            session_id: parse_session_id(&self.session_id)?,
            role: MessageRole::from(self.role),
            content: self.content,
            tool_calls: parse_blob(self.tool_calls)?,
            created_at: parse_timestamp(&self.created_at)?,
            token_count,
        })
    }
}

/// Current time in the column format.
pub(crate) fn now_timestamp() -> String {
    format_timestamp(&Utc::now())
}

pub(crate) fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, GatewayError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| corrupt(format!("invalid timestamp {s:?}: {e}")))
}

fn parse_session_id(s: &str) -> Result<SessionId, GatewayError> {
    s.parse()
        .map_err(|e| corrupt(format!("invalid session id {s:?}: {e}")))
}

fn parse_blob(text: Option<String>) -> Result<Option<JsonBlob>, GatewayError> {
    text.map(JsonBlob::from_text)
        .transpose()
        .map_err(|e| corrupt(format!("invalid stored json: {e}")))
}

fn corrupt(detail: String) -> GatewayError {
    GatewayError::StorageUnavailable(format!("corrupt row: {detail}"))
}
