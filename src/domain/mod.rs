//! Domain layer: conversation records, opaque payloads, and catalog products.
//!
//! Sessions, messages, and analytics events are owned by the conversation
//! store; products are transient values produced by the catalog client.

pub mod conversation;
pub mod json_blob;
pub mod product;
pub mod session_id;

pub use conversation::{
    Message, MessageRole, NewMessage, PRODUCT_VIEWED_EVENT, Session, SessionStatus,
};
pub use json_blob::JsonBlob;
pub use product::{Product, Variant};
pub use session_id::SessionId;
