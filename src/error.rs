//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. The store, the
//! catalog client, and the service layer all return it; each variant maps to
//! a specific HTTP status code and structured JSON error response.
//!
//! Absent sessions and products are *not* errors at the store or catalog
//! level (they come back as `None`); only the service layer turns them into
//! [`GatewayError::SessionNotFound`] / [`GatewayError::ProductNotFound`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::SessionId;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "session not found: 0b6f...",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category         | HTTP Status                    |
/// |-----------|------------------|--------------------------------|
/// | 1000–1999 | Validation       | 400 Bad Request                |
/// | 2000–2999 | State/Not Found  | 404 Not Found / 409 Conflict   |
/// | 3000–3999 | Server/Upstream  | 500 / 502 / 503 / 504          |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Session with the given ID does not exist.
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    /// Catalog has no product with the given ID.
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// A write referenced a session that does not exist.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// SQLite is unreachable, busy past its timeout, or returned corrupt data.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Catalog transport failure, non-2xx status, or GraphQL error payload.
    #[error("catalog query failed: {0}")]
    CatalogQueryFailed(String),

    /// Catalog request exceeded the configured timeout.
    #[error("catalog request timed out")]
    CatalogTimeout,

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::SessionNotFound(_) => 2001,
            Self::ProductNotFound(_) => 2002,
            Self::ConstraintViolation(_) => 2003,
            Self::Internal(_) => 3000,
            Self::StorageUnavailable(_) => 3001,
            Self::CatalogQueryFailed(_) => 3002,
            Self::CatalogTimeout => 3003,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::SessionNotFound(_) | Self::ProductNotFound(_) => StatusCode::NOT_FOUND,
            Self::ConstraintViolation(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::CatalogQueryFailed(_) => StatusCode::BAD_GATEWAY,
            Self::CatalogTimeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(code = self.error_code(), error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
