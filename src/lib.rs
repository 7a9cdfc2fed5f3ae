//! # shopchat-gateway
//!
//! Conversation persistence and product catalog access for a chat-based
//! sales assistant.
//!
//! The crate keeps sessions, messages and analytics events in SQLite and
//! reads products from a Shopify store over GraphQL. Both are exposed to the
//! assistant's orchestration layer through a small REST API. The store and
//! the catalog never call each other; handlers compose them.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── SessionService (service/)     CatalogClient (catalog/)
//!     │                                        │
//!     ├── ConversationStore (persistence/)     └── Shopify GraphQL
//!     │
//!     └── SQLite
//! ```

pub mod api;
pub mod app_state;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
