//! Data Transfer Objects for REST request/response serialization.
//!
//! Free-form JSON fields (`metadata`, `tool_calls`, `event_data`) are carried
//! as [`JsonBlob`](crate::domain::JsonBlob) and echoed back byte-for-byte.

pub mod common_dto;
pub mod product_dto;
pub mod session_dto;

pub use common_dto::*;
pub use product_dto::*;
pub use session_dto::*;
