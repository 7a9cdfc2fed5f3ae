//! Service layer: business rules between the HTTP handlers and the store.
//!
//! [`SessionService`] performs the existence checks and input validation the
//! conversation store leaves to its callers.

pub mod session_service;

pub use session_service::{MAX_PAGE_SIZE, SessionDetail, SessionService, SessionSummary};
