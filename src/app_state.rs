//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::catalog::CatalogClient;
use crate::service::SessionService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Session and message operations.
    pub session_service: Arc<SessionService>,
    /// Product catalog client.
    pub catalog: Arc<CatalogClient>,
}
