//! Product handlers: catalog search and product detail.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::api::dto::{ProductViewParams, SearchParams};
use crate::app_state::AppState;
use crate::domain::{JsonBlob, PRODUCT_VIEWED_EVENT, Product, SessionId};
use crate::error::{ErrorResponse, GatewayError};

/// `GET /products/search` — Keyword search against the catalog.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] for a missing or blank query or
/// a bad limit, and the catalog errors of
/// [`CatalogClient::search_products`](crate::catalog::CatalogClient::search_products).
#[utoipa::path(
    get,
    path = "/api/products/search",
    tag = "Products",
    summary = "Search products",
    description = "Relevance-ordered keyword search. Results are normalized and returned in catalog order.",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching products", body = Vec<Product>),
        (status = 400, description = "Missing query or invalid limit", body = ErrorResponse),
        (status = 502, description = "Catalog query failed", body = ErrorResponse),
        (status = 504, description = "Catalog timed out", body = ErrorResponse),
    )
)]
pub async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let (query, limit) = params.validated()?;
    let products = state.catalog.search_products(query, limit).await?;
    Ok(Json(products))
}

/// `GET /products/{product_id}` — Single product by global id.
///
/// The id is the catalog GID (`gid://shopify/Product/123`), so the route
/// captures the rest of the path. When `session_id` is given, a
/// `product_viewed` event is recorded for that session; a failure to record
/// it is logged and does not fail the lookup.
///
/// # Errors
///
/// Returns [`GatewayError::ProductNotFound`] when the catalog has no such
/// product, and the catalog errors of
/// [`CatalogClient::get_product`](crate::catalog::CatalogClient::get_product).
#[utoipa::path(
    get,
    path = "/api/products/{product_id}",
    tag = "Products",
    summary = "Get a product",
    description = "Fetches one product with up to five images and twenty variants.",
    params(
        ("product_id" = String, Path, description = "Catalog global id"),
        ProductViewParams,
    ),
    responses(
        (status = 200, description = "Product details", body = Product),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 502, description = "Catalog query failed", body = ErrorResponse),
        (status = 504, description = "Catalog timed out", body = ErrorResponse),
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Query(params): Query<ProductViewParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let product = state
        .catalog
        .get_product(&product_id)
        .await?
        .ok_or(GatewayError::ProductNotFound(product_id))?;

    if let Some(session_id) = params.session() {
        record_view(&state, &session_id, &product).await;
    }

    Ok(Json(product))
}

async fn record_view(state: &AppState, session_id: &SessionId, product: &Product) {
    let data = match JsonBlob::from_value(&json!({
        "product_id": product.id,
        "title": product.title,
    })) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(%session_id, error = %e, "cannot encode product view");
            return;
        }
    };

    if let Err(e) = state
        .session_service
        .log_event(session_id, PRODUCT_VIEWED_EVENT, Some(&data))
        .await
    {
        tracing::warn!(%session_id, product_id = %product.id, error = %e, "product view not recorded");
    }
}

/// Product routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products/search", get(search_products))
        .route("/products/{*product_id}", get(get_product))
}
