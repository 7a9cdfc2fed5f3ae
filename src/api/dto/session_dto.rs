//! Session and message DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{JsonBlob, Message, NewMessage, SessionId};
use crate::service::{SessionDetail, SessionSummary};

/// Request body for `POST /sessions`. The body itself is optional.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateSessionRequest {
    /// Arbitrary JSON stored verbatim with the session.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<JsonBlob>,
}

/// Response body for `POST /sessions` (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateSessionResponse {
    /// Identifier of the new session.
    #[schema(value_type = String, format = Uuid)]
    pub session_id: SessionId,
}

/// Session entry in `GET /sessions`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionInfoDto {
    /// Session identifier.
    #[schema(value_type = String, format = Uuid)]
    pub session_id: SessionId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Number of stored messages.
    pub message_count: u64,
    /// Time of the last write to the session.
    pub last_active: DateTime<Utc>,
}

impl From<SessionSummary> for SessionInfoDto {
    fn from(summary: SessionSummary) -> Self {
        Self {
            session_id: summary.session.id,
            created_at: summary.session.created_at,
            message_count: summary.message_count,
            last_active: summary.session.updated_at,
        }
    }
}

/// A stored conversation turn.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageDto {
    /// Store-assigned message id, increasing in append order.
    pub id: i64,
    /// Speaker role (`user`, `assistant`, `system`, or a custom value).
    pub role: String,
    /// Message text.
    pub content: String,
    /// Tool invocations attached to the message, verbatim.
    #[schema(value_type = Option<Object>)]
    pub tool_calls: Option<JsonBlob>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Optional token usage.
    pub token_count: Option<u32>,
}

impl From<Message> for MessageDto {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            role: message.role.as_str().to_string(),
            content: message.content,
            tool_calls: message.tool_calls,
            created_at: message.created_at,
            token_count: message.token_count,
        }
    }
}

/// Response body for `GET /sessions/{id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionDetailResponse {
    /// Session identifier.
    #[schema(value_type = String, format = Uuid)]
    pub session_id: SessionId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Time of the last write to the session.
    pub updated_at: DateTime<Utc>,
    /// `active` or `ended`.
    pub status: String,
    /// Session metadata, verbatim.
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<JsonBlob>,
    /// Full conversation, oldest first.
    pub messages: Vec<MessageDto>,
}

impl From<SessionDetail> for SessionDetailResponse {
    fn from(detail: SessionDetail) -> Self {
        let SessionDetail { session, messages } = detail;
        Self {
            session_id: session.id,
            created_at: session.created_at,
            updated_at: session.updated_at,
            status: session.status.to_string(),
            metadata: session.metadata,
            messages: messages.into_iter().map(MessageDto::from).collect(),
        }
    }
}

/// Request body for `POST /sessions/{id}/messages`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AppendMessageRequest {
    /// Speaker role.
    pub role: String,
    /// Message text.
    pub content: String,
    /// Optional tool invocations, stored verbatim.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub tool_calls: Option<JsonBlob>,
    /// Optional token usage.
    #[serde(default)]
    pub token_count: Option<u32>,
}

impl From<AppendMessageRequest> for NewMessage {
    fn from(req: AppendMessageRequest) -> Self {
        let mut message = NewMessage::new(req.role, req.content);
        message.tool_calls = req.tool_calls;
        message.token_count = req.token_count;
        message
    }
}

/// Response body for `POST /sessions/{id}/messages` (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct AppendMessageResponse {
    /// Id of the stored message.
    pub message_id: i64,
}

/// Request body for `POST /sessions/{id}/events`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LogEventRequest {
    /// Event name, e.g. `product_viewed`.
    pub event_type: String,
    /// Optional event payload, stored verbatim.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub event_data: Option<JsonBlob>,
}
