//! Session service: existence checks and validation in front of the store.

use crate::domain::{JsonBlob, Message, NewMessage, Session, SessionId};
use crate::error::GatewayError;
use crate::persistence::ConversationStore;

/// Largest page size accepted by [`SessionService::list_sessions`].
pub const MAX_PAGE_SIZE: u32 = 100;

/// A listed session with its message count.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    /// The session record.
    pub session: Session,
    /// Number of stored messages.
    pub message_count: u64,
}

/// A session with its full conversation, in replay order.
#[derive(Debug, Clone)]
pub struct SessionDetail {
    /// The session record.
    pub session: Session,
    /// All messages, oldest first.
    pub messages: Vec<Message>,
}

/// Routing-facing facade over [`ConversationStore`].
///
/// The store reports absent sessions as `None` and ignores unknown ids on
/// `end_session`; this service turns both into
/// [`GatewayError::SessionNotFound`] so handlers can answer 404.
#[derive(Debug, Clone)]
pub struct SessionService {
    store: ConversationStore,
}

impl SessionService {
    /// Creates a new `SessionService`.
    #[must_use]
    pub fn new(store: ConversationStore) -> Self {
        Self { store }
    }

    /// Starts a new conversation.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn create_session(
        &self,
        metadata: Option<&JsonBlob>,
    ) -> Result<SessionId, GatewayError> {
        let session_id = self.store.create_session(metadata).await?;
        tracing::info!(%session_id, "session started");
        Ok(session_id)
    }

    /// Lists active sessions, most recent first, with message counts.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if `limit` is outside
    /// `1..=100`; propagates store failures.
    pub async fn list_sessions(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<SessionSummary>, GatewayError> {
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(GatewayError::InvalidRequest(format!(
                "limit must be between 1 and {MAX_PAGE_SIZE}, got {limit}"
            )));
        }

        let sessions = self.store.list_sessions(limit, offset).await?;
        let mut summaries = Vec::with_capacity(sessions.len());
        for session in sessions {
            let message_count = self.store.count_messages(&session.id).await?;
            summaries.push(SessionSummary {
                session,
                message_count,
            });
        }
        Ok(summaries)
    }

    /// Fetches a session, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::SessionNotFound`] if absent; propagates store
    /// failures.
    pub async fn session(&self, session_id: &SessionId) -> Result<Session, GatewayError> {
        self.store
            .get_session(session_id)
            .await?
            .ok_or(GatewayError::SessionNotFound(*session_id))
    }

    /// Fetches a session together with its conversation.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::SessionNotFound`] if absent; propagates store
    /// failures.
    pub async fn session_detail(
        &self,
        session_id: &SessionId,
    ) -> Result<SessionDetail, GatewayError> {
        let session = self.session(session_id).await?;
        let messages = self.store.get_messages(session_id).await?;
        Ok(SessionDetail { session, messages })
    }

    /// Ends an existing session. Ending an already-ended session succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::SessionNotFound`] if absent; propagates store
    /// failures.
    pub async fn end_session(&self, session_id: &SessionId) -> Result<(), GatewayError> {
        self.session(session_id).await?;
        self.store.end_session(session_id).await?;
        tracing::info!(%session_id, "session ended");
        Ok(())
    }

    /// Returns the conversation of an existing session.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::SessionNotFound`] if absent; propagates store
    /// failures.
    pub async fn messages(&self, session_id: &SessionId) -> Result<Vec<Message>, GatewayError> {
        self.session(session_id).await?;
        self.store.get_messages(session_id).await
    }

    /// Appends a message to an active session.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::SessionNotFound`] if absent,
    /// [`GatewayError::InvalidRequest`] if the session has ended or the
    /// content is empty; propagates store failures.
    pub async fn append_message(
        &self,
        session_id: &SessionId,
        message: &NewMessage,
    ) -> Result<i64, GatewayError> {
        if message.content.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "message content must not be empty".to_string(),
            ));
        }
        let session = self.session(session_id).await?;
        if !session.is_active() {
            return Err(GatewayError::InvalidRequest(format!(
                "session {session_id} has ended"
            )));
        }
        self.store.save_message(session_id, message).await
    }

    /// Records an analytics event for an existing session.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::SessionNotFound`] if absent,
    /// [`GatewayError::InvalidRequest`] for an empty event type; propagates
    /// store failures.
    pub async fn log_event(
        &self,
        session_id: &SessionId,
        event_type: &str,
        event_data: Option<&JsonBlob>,
    ) -> Result<(), GatewayError> {
        if event_type.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "event_type must not be empty".to_string(),
            ));
        }
        self.session(session_id).await?;
        self.store.log_event(session_id, event_type, event_data).await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::domain::{MessageRole, SessionStatus};

    async fn make_service() -> (tempfile::TempDir, SessionService) {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let Ok(store) = ConversationStore::connect(&StoreConfig::new(dir.path().join("t.db"))).await
        else {
            panic!("store should open");
        };
        (dir, SessionService::new(store))
    }

    #[tokio::test]
    async fn unknown_session_maps_to_not_found() {
        let (_dir, service) = make_service().await;
        let ghost = SessionId::new();

        assert!(matches!(
            service.session_detail(&ghost).await,
            Err(GatewayError::SessionNotFound(id)) if id == ghost
        ));
        assert!(matches!(
            service.end_session(&ghost).await,
            Err(GatewayError::SessionNotFound(_))
        ));
        assert!(matches!(
            service.messages(&ghost).await,
            Err(GatewayError::SessionNotFound(_))
        ));
        assert!(matches!(
            service
                .append_message(&ghost, &NewMessage::new(MessageRole::User, "hi"))
                .await,
            Err(GatewayError::SessionNotFound(_))
        ));
        assert!(matches!(
            service.log_event(&ghost, "product_viewed", None).await,
            Err(GatewayError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn detail_includes_messages_in_order() {
        let (_dir, service) = make_service().await;
        let Ok(id) = service.create_session(None).await else {
            panic!("create failed");
        };
        for (role, text) in [(MessageRole::User, "hi"), (MessageRole::Assistant, "hello!")] {
            let Ok(_) = service
                .append_message(&id, &NewMessage::new(role, text))
                .await
            else {
                panic!("append failed");
            };
        }

        let Ok(detail) = service.session_detail(&id).await else {
            panic!("detail failed");
        };
        assert_eq!(detail.session.status, SessionStatus::Active);
        let roles: Vec<&str> = detail.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["user", "assistant"]);
    }

    #[tokio::test]
    async fn ended_session_rejects_new_messages() {
        let (_dir, service) = make_service().await;
        let Ok(id) = service.create_session(None).await else {
            panic!("create failed");
        };
        assert!(service.end_session(&id).await.is_ok());
        assert!(service.end_session(&id).await.is_ok());

        let result = service
            .append_message(&id, &NewMessage::new(MessageRole::User, "anyone?"))
            .await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn empty_inputs_are_rejected() {
        let (_dir, service) = make_service().await;
        let Ok(id) = service.create_session(None).await else {
            panic!("create failed");
        };
        assert!(matches!(
            service
                .append_message(&id, &NewMessage::new(MessageRole::User, "   "))
                .await,
            Err(GatewayError::InvalidRequest(_))
        ));
        assert!(matches!(
            service.log_event(&id, "", None).await,
            Err(GatewayError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn list_validates_limit_and_counts_messages() {
        let (_dir, service) = make_service().await;
        assert!(matches!(
            service.list_sessions(0, 0).await,
            Err(GatewayError::InvalidRequest(_))
        ));
        assert!(matches!(
            service.list_sessions(101, 0).await,
            Err(GatewayError::InvalidRequest(_))
        ));

        let Ok(id) = service.create_session(None).await else {
            panic!("create failed");
        };
        let Ok(_) = service
            .append_message(&id, &NewMessage::new(MessageRole::User, "hello"))
            .await
        else {
            panic!("append failed");
        };

        let Ok(list) = service.list_sessions(20, 0).await else {
            panic!("list failed");
        };
        assert_eq!(list.len(), 1);
        assert_eq!(list.first().map(|s| s.message_count), Some(1));
    }
}
