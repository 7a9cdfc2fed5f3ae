//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::handlers::{product, session, system};

/// Generated OpenAPI description of every `/api` route.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "shopchat-gateway",
        description = "Conversation store and product catalog API for a chat-based sales assistant."
    ),
    paths(
        system::health_handler,
        session::create_session,
        session::list_sessions,
        session::get_session,
        session::end_session,
        session::list_messages,
        session::append_message,
        session::log_event,
        product::search_products,
        product::get_product,
    ),
    tags(
        (name = "System", description = "Service health"),
        (name = "Sessions", description = "Conversations, messages and analytics events"),
        (name = "Products", description = "Catalog search and product detail"),
    )
)]
pub struct ApiDoc;
