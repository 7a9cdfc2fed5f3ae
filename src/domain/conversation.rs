//! Conversation records: sessions, messages, and analytics event tags.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{JsonBlob, SessionId};

/// Event tag logged when a product detail is fetched on behalf of a session.
pub const PRODUCT_VIEWED_EVENT: &str = "product_viewed";

/// Lifecycle state of a session.
///
/// A session starts `Active` and moves to `Ended` at most once; it never
/// goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Conversation is open and accepts new messages.
    Active,
    /// Conversation was explicitly terminated.
    Ended,
}

impl SessionStatus {
    /// Returns the value stored in the `sessions.status` column.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Ended => "ended",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "ended" => Ok(Self::Ended),
            other => Err(format!("unknown session status: {other}")),
        }
    }
}

/// Author of a message.
///
/// `user` and `assistant` are the common cases; any other string is kept
/// as-is so callers can record system prompts or tool results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageRole {
    /// End user of the storefront chat.
    User,
    /// The sales assistant.
    Assistant,
    /// System instructions.
    System,
    /// Any other caller-defined role.
    Other(String),
}

impl MessageRole {
    /// Returns the role as stored in the `messages.role` column.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
            Self::Other(role) => role,
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for MessageRole {
    fn from(role: String) -> Self {
        match role.as_str() {
            "user" => Self::User,
            "assistant" => Self::Assistant,
            "system" => Self::System,
            _ => Self::Other(role),
        }
    }
}

impl From<&str> for MessageRole {
    fn from(role: &str) -> Self {
        Self::from(role.to_string())
    }
}

impl From<MessageRole> for String {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::Other(role) => role,
            known => known.as_str().to_string(),
        }
    }
}

/// A stored conversation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Session identifier.
    pub id: SessionId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last activity: creation, message append, or ending.
    pub updated_at: DateTime<Utc>,
    /// Caller-supplied metadata, kept opaque.
    pub metadata: Option<JsonBlob>,
    /// Lifecycle state.
    pub status: SessionStatus,
}

impl Session {
    /// Returns `true` while the session accepts new messages.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }
}

/// A stored, immutable conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// Auto-increment row id; also the tie-breaker for replay order.
    pub id: i64,
    /// Owning session.
    pub session_id: SessionId,
    /// Author of the message.
    pub role: MessageRole,
    /// Message text.
    pub content: String,
    /// Tool invocations recorded with the message, kept opaque.
    pub tool_calls: Option<JsonBlob>,
    /// Write timestamp.
    pub created_at: DateTime<Utc>,
    /// Token usage, when the producer reported one.
    pub token_count: Option<u32>,
}

/// A message about to be appended to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    /// Author of the message.
    pub role: MessageRole,
    /// Message text.
    pub content: String,
    /// Optional tool-call record.
    pub tool_calls: Option<JsonBlob>,
    /// Optional token usage.
    pub token_count: Option<u32>,
}

impl NewMessage {
    /// Creates a message with no tool calls and no token count.
    #[must_use]
    pub fn new(role: impl Into<MessageRole>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            tool_calls: None,
            token_count: None,
        }
    }

    /// Attaches a tool-call record.
    #[must_use]
    pub fn with_tool_calls(mut self, tool_calls: JsonBlob) -> Self {
        self.tool_calls = Some(tool_calls);
        self
    }

    /// Attaches a token count.
    #[must_use]
    pub const fn with_token_count(mut self, token_count: u32) -> Self {
        self.token_count = Some(token_count);
        self
    }
}
