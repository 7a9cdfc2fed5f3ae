//! Persistence layer: SQLite conversation store.
//!
//! [`ConversationStore`] owns the `sessions`, `messages`, and `events`
//! tables. It uses a pooled `sqlx::SqlitePool`; every operation acquires a
//! connection for the duration of the call and returns it on every exit
//! path.

pub mod models;
pub mod schema;
pub mod sqlite;

pub use sqlite::ConversationStore;
