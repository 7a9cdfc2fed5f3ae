//! HTTP client for the Shopify GraphQL APIs.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::normalize::{Connection, RawProduct, normalize_product};
use super::queries::{GET_PRODUCT, SEARCH_PRODUCTS};
use crate::config::CatalogConfig;
use crate::domain::Product;
use crate::error::GatewayError;

/// Number of products returned by a search when the caller does not say.
pub const DEFAULT_SEARCH_LIMIT: u32 = 5;

const STOREFRONT_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";
const ADMIN_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Longest upstream error body echoed back in an error message.
const MAX_ERROR_BODY: usize = 512;

/// Client for the external product catalog.
///
/// Holds one pooled `reqwest::Client` for its whole lifetime. Every call is
/// a fresh round trip: no retries, no caching. Requests that exceed the
/// configured timeout fail with [`GatewayError::CatalogTimeout`].
///
/// Call [`shutdown`](Self::shutdown) once when the client is no longer
/// needed.
#[derive(Debug)]
pub struct CatalogClient {
    http: reqwest::Client,
    storefront_url: String,
    admin_url: String,
    storefront_token: SecretString,
    admin_token: SecretString,
}

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    products: Connection<RawProduct>,
}

#[derive(Debug, Deserialize)]
struct ProductData {
    product: Option<RawProduct>,
}

impl CatalogClient {
    /// Builds a client from its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Internal`] if the HTTP client cannot be
    /// constructed (e.g. TLS backend initialization failure).
    pub fn new(config: CatalogConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Internal(format!("cannot build http client: {e}")))?;

        Ok(Self {
            storefront_url: config.storefront_endpoint(),
            admin_url: config.admin_endpoint(),
            http,
            storefront_token: config.storefront_token,
            admin_token: config.admin_token,
        })
    }

    /// Keyword search, in the catalog's relevance order.
    ///
    /// Each product carries at most one image and ten variants.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::CatalogQueryFailed`] on transport failure,
    /// non-2xx status, or a GraphQL error payload, and
    /// [`GatewayError::CatalogTimeout`] when the request times out.
    pub async fn search_products(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Product>, GatewayError> {
        tracing::debug!(query, limit, "searching catalog");
        let data: SearchData = self
            .storefront_query(SEARCH_PRODUCTS, json!({ "query": query, "first": limit }))
            .await?;

        let products: Vec<Product> = data.products.into_nodes().map(normalize_product).collect();
        tracing::info!(query, results = products.len(), "catalog search complete");
        Ok(products)
    }

    /// Fetches one product by its global id, with up to five images and
    /// twenty variants. Returns `Ok(None)` when the catalog has no such
    /// product.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`search_products`](Self::search_products).
    pub async fn get_product(&self, product_id: &str) -> Result<Option<Product>, GatewayError> {
        tracing::debug!(product_id, "fetching product");
        let data: ProductData = self
            .storefront_query(GET_PRODUCT, json!({ "id": product_id }))
            .await?;

        Ok(data.product.map(normalize_product))
    }

    /// Sends a raw GraphQL document to the Admin API and returns its `data`.
    ///
    /// Uses the administrative token; intended for write operations that
    /// the read-only storefront token cannot perform.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`search_products`](Self::search_products).
    pub async fn admin_query(&self, query: &str, variables: Value) -> Result<Value, GatewayError> {
        self.execute(&self.admin_url, ADMIN_TOKEN_HEADER, &self.admin_token, query, variables)
            .await
    }

    /// Releases the underlying connection pool.
    ///
    /// Consumes the client, so it cannot be used or shut down again.
    pub fn shutdown(self) {
        drop(self.http);
        tracing::info!("catalog client shut down");
    }

    async fn storefront_query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, GatewayError> {
        self.execute(
            &self.storefront_url,
            STOREFRONT_TOKEN_HEADER,
            &self.storefront_token,
            query,
            variables,
        )
        .await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        token_header: &'static str,
        token: &SecretString,
        query: &str,
        variables: Value,
    ) -> Result<T, GatewayError> {
        let response = self
            .http
            .post(endpoint)
            .header(token_header, token.expose_secret())
            .json(&GraphqlRequest { query, variables })
            .send()
            .await
            .map_err(transport_error)
            .inspect_err(|e| tracing::warn!(endpoint, error = %e, "catalog request failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(endpoint, %status, "catalog returned error status");
            return Err(GatewayError::CatalogQueryFailed(format!(
                "HTTP {status}: {}",
                truncate(&body)
            )));
        }

        // `data` stays untyped until `errors` has been checked: an error
        // response may carry partial or null data that does not fit `T`.
        let envelope: GraphqlResponse<Value> =
            response.json().await.map_err(transport_error)?;

        if let Some(errors) = envelope.errors
            && !errors.is_null()
        {
            let detail = describe_errors(&errors);
            tracing::warn!(endpoint, %detail, "catalog returned graphql errors");
            return Err(GatewayError::CatalogQueryFailed(detail));
        }

        let data = envelope
            .data
            .filter(|data| !data.is_null())
            .ok_or_else(|| {
                GatewayError::CatalogQueryFailed("response contained no data".to_string())
            })?;

        serde_json::from_value(data).map_err(|e| {
            tracing::warn!(endpoint, error = %e, "catalog data has unexpected shape");
            GatewayError::CatalogQueryFailed(format!("unexpected response shape: {e}"))
        })
    }
}

fn transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::CatalogTimeout
    } else {
        GatewayError::CatalogQueryFailed(err.to_string())
    }
}

/// Joins the `message` fields of a GraphQL `errors` array, falling back to
/// the raw JSON for any other shape.
fn describe_errors(errors: &Value) -> String {
    let messages: Vec<&str> = errors
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("message").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    if messages.is_empty() {
        truncate(&errors.to_string())
    } else {
        messages.join("; ")
    }
}

fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_ERROR_BODY) {
        Some((cut, _)) => format!("{}...", text.get(..cut).unwrap_or_default()),
        None => text.to_string(),
    }
}
