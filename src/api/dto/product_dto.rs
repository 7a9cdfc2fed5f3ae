//! Product search and lookup query parameters.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::catalog::DEFAULT_SEARCH_LIMIT;
use crate::domain::SessionId;
use crate::error::GatewayError;

/// Largest number of results one search may request.
pub const MAX_SEARCH_LIMIT: u32 = 50;

/// Query parameters for `GET /products/search`.
///
/// Both fields are loosely typed so that a missing query or a negative limit
/// reaches [`validated`](Self::validated) and is reported as an
/// `InvalidRequest` instead of a bare query rejection.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Keyword query.
    #[serde(default)]
    pub q: Option<String>,
    /// Maximum number of products (1 to 50). Defaults to 5.
    #[serde(default = "default_search_limit")]
    #[param(minimum = 1, maximum = 50)]
    pub limit: i64,
}

fn default_search_limit() -> i64 {
    i64::from(DEFAULT_SEARCH_LIMIT)
}

impl SearchParams {
    /// Checks that the query is present and non-blank and the limit is in
    /// range; returns the trimmed query and the limit.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] otherwise.
    pub fn validated(&self) -> Result<(&str, u32), GatewayError> {
        let query = self
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| {
                GatewayError::InvalidRequest(
                    "query parameter `q` must not be empty".to_string(),
                )
            })?;
        let limit = u32::try_from(self.limit)
            .ok()
            .filter(|limit| (1..=MAX_SEARCH_LIMIT).contains(limit))
            .ok_or_else(|| {
                GatewayError::InvalidRequest(format!(
                    "limit must be between 1 and {MAX_SEARCH_LIMIT}, got {}",
                    self.limit
                ))
            })?;
        Ok((query, limit))
    }
}

/// Query parameters for `GET /products/{product_id}`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductViewParams {
    /// Session viewing the product; when present a `product_viewed` event
    /// is recorded for it.
    #[serde(default)]
    #[param(value_type = Option<String>, format = Uuid)]
    pub session_id: Option<uuid::Uuid>,
}

impl ProductViewParams {
    /// The viewing session, if any.
    #[must_use]
    pub fn session(&self) -> Option<SessionId> {
        self.session_id.map(SessionId::from_uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search(q: Option<&str>, limit: i64) -> SearchParams {
        SearchParams {
            q: q.map(str::to_string),
            limit,
        }
    }

    #[test]
    fn limit_defaults_to_five() {
        let params: Result<SearchParams, _> = serde_json::from_str(r#"{"q":" boots "}"#);
        assert!(matches!(
            params.as_ref().map(SearchParams::validated),
            Ok(Ok(("boots", 5)))
        ));
    }

    #[test]
    fn out_of_range_limits_are_rejected() {
        for limit in [-1, 0, i64::from(MAX_SEARCH_LIMIT) + 1] {
            assert!(matches!(
                search(Some("shoes"), limit).validated(),
                Err(GatewayError::InvalidRequest(_))
            ));
        }
    }

    #[test]
    fn missing_or_blank_query_is_rejected() {
        for q in [None, Some(""), Some("  ")] {
            assert!(matches!(
                search(q, 5).validated(),
                Err(GatewayError::InvalidRequest(_))
            ));
        }
    }
}
