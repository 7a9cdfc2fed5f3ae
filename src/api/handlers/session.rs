//! Session handlers: create, list, inspect, end, messages, events.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    AppendMessageRequest, AppendMessageResponse, CreateSessionRequest, CreateSessionResponse,
    LogEventRequest, MessageDto, PaginationParams, SessionDetailResponse, SessionInfoDto,
};
use crate::app_state::AppState;
use crate::domain::{NewMessage, SessionId};
use crate::error::{ErrorResponse, GatewayError};

/// `POST /sessions` — Start a new conversation.
///
/// # Errors
///
/// Returns [`GatewayError`] on storage failure.
#[utoipa::path(
    post,
    path = "/api/sessions",
    tag = "Sessions",
    summary = "Create a session",
    description = "Starts a new active conversation. The body is optional; when present its `metadata` is stored verbatim.",
    request_body(content = CreateSessionRequest, description = "Optional session metadata"),
    responses(
        (status = 201, description = "Session created", body = CreateSessionResponse),
        (status = 503, description = "Storage unavailable", body = ErrorResponse),
    )
)]
pub async fn create_session(
    State(state): State<AppState>,
    body: Option<Json<CreateSessionRequest>>,
) -> Result<impl IntoResponse, GatewayError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let session_id = state
        .session_service
        .create_session(req.metadata.as_ref())
        .await?;

    Ok((StatusCode::CREATED, Json(CreateSessionResponse { session_id })))
}

/// `GET /sessions` — List active sessions, most recently active first.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] for out-of-range pagination.
#[utoipa::path(
    get,
    path = "/api/sessions",
    tag = "Sessions",
    summary = "List sessions",
    description = "Returns active sessions ordered by last activity, newest first.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Session page", body = Vec<SessionInfoDto>),
        (status = 400, description = "Invalid pagination", body = ErrorResponse),
    )
)]
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let (limit, offset) = params.validated()?;
    let summaries = state.session_service.list_sessions(limit, offset).await?;

    let data: Vec<SessionInfoDto> = summaries.into_iter().map(SessionInfoDto::from).collect();
    Ok(Json(data))
}

/// `GET /sessions/{id}` — Session with its full conversation.
///
/// # Errors
///
/// Returns [`GatewayError::SessionNotFound`] if the session does not exist.
#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    tag = "Sessions",
    summary = "Get session details",
    description = "Returns the session record and every message in append order.",
    params(
        ("id" = uuid::Uuid, Path, description = "Session UUID"),
    ),
    responses(
        (status = 200, description = "Session details", body = SessionDetailResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
    )
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let detail = state
        .session_service
        .session_detail(&SessionId::from_uuid(id))
        .await?;
    Ok(Json(SessionDetailResponse::from(detail)))
}

/// `DELETE /sessions/{id}` — End a session.
///
/// # Errors
///
/// Returns [`GatewayError::SessionNotFound`] if the session does not exist.
#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    tag = "Sessions",
    summary = "End a session",
    description = "Marks the session as ended. Its history is kept; ending twice is harmless.",
    params(
        ("id" = uuid::Uuid, Path, description = "Session UUID"),
    ),
    responses(
        (status = 204, description = "Session ended"),
        (status = 404, description = "Session not found", body = ErrorResponse),
    )
)]
pub async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    state
        .session_service
        .end_session(&SessionId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /sessions/{id}/messages` — Conversation history.
///
/// # Errors
///
/// Returns [`GatewayError::SessionNotFound`] if the session does not exist.
#[utoipa::path(
    get,
    path = "/api/sessions/{id}/messages",
    tag = "Sessions",
    summary = "List messages",
    description = "Returns every message of the session, oldest first.",
    params(
        ("id" = uuid::Uuid, Path, description = "Session UUID"),
    ),
    responses(
        (status = 200, description = "Messages", body = Vec<MessageDto>),
        (status = 404, description = "Session not found", body = ErrorResponse),
    )
)]
pub async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let messages = state
        .session_service
        .messages(&SessionId::from_uuid(id))
        .await?;
    let data: Vec<MessageDto> = messages.into_iter().map(MessageDto::from).collect();
    Ok(Json(data))
}

/// `POST /sessions/{id}/messages` — Append a message.
///
/// # Errors
///
/// Returns [`GatewayError::SessionNotFound`] if the session does not exist
/// and [`GatewayError::InvalidRequest`] if it has ended.
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/messages",
    tag = "Sessions",
    summary = "Append a message",
    description = "Stores one conversation turn and bumps the session's last-activity time.",
    params(
        ("id" = uuid::Uuid, Path, description = "Session UUID"),
    ),
    request_body = AppendMessageRequest,
    responses(
        (status = 201, description = "Message stored", body = AppendMessageResponse),
        (status = 400, description = "Empty content or ended session", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
    )
)]
pub async fn append_message(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<AppendMessageRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let session_id = SessionId::from_uuid(id);
    let message = NewMessage::from(req);
    let message_id = state
        .session_service
        .append_message(&session_id, &message)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AppendMessageResponse { message_id }),
    ))
}

/// `POST /sessions/{id}/events` — Record an analytics event.
///
/// # Errors
///
/// Returns [`GatewayError::SessionNotFound`] if the session does not exist.
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/events",
    tag = "Sessions",
    summary = "Log an event",
    description = "Appends an analytics event. Events never change the session's last-activity time.",
    params(
        ("id" = uuid::Uuid, Path, description = "Session UUID"),
    ),
    request_body = LogEventRequest,
    responses(
        (status = 202, description = "Event recorded"),
        (status = 400, description = "Empty event type", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
    )
)]
pub async fn log_event(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<LogEventRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    state
        .session_service
        .log_event(
            &SessionId::from_uuid(id),
            &req.event_type,
            req.event_data.as_ref(),
        )
        .await?;
    Ok(StatusCode::ACCEPTED)
}

/// Session routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(create_session).get(list_sessions))
        .route("/sessions/{id}", get(get_session).delete(end_session))
        .route(
            "/sessions/{id}/messages",
            get(list_messages).post(append_message),
        )
        .route("/sessions/{id}/events", post(log_event))
}
