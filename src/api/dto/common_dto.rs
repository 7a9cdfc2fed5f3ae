//! Shared DTO types used across multiple endpoints.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::GatewayError;
use crate::service::MAX_PAGE_SIZE;

/// Pagination query parameters for list endpoints.
///
/// Kept signed so that a negative value reaches validation and is reported
/// as an `InvalidRequest` instead of a bare query rejection.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Maximum number of items (1 to 100). Defaults to 20.
    #[serde(default = "default_limit")]
    #[param(minimum = 1, maximum = 100)]
    pub limit: i64,
    /// Number of items to skip. Defaults to 0.
    #[serde(default)]
    #[param(minimum = 0)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

impl PaginationParams {
    /// Checks the bounds and returns `(limit, offset)`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if `limit` is outside
    /// `1..=100` or `offset` is negative.
    pub fn validated(&self) -> Result<(u32, u32), GatewayError> {
        let limit = u32::try_from(self.limit)
            .ok()
            .filter(|limit| (1..=MAX_PAGE_SIZE).contains(limit))
            .ok_or_else(|| {
                GatewayError::InvalidRequest(format!(
                    "limit must be between 1 and {MAX_PAGE_SIZE}, got {}",
                    self.limit
                ))
            })?;
        let offset = u32::try_from(self.offset).map_err(|_| {
            GatewayError::InvalidRequest(format!(
                "offset must be a non-negative integer, got {}",
                self.offset
            ))
        })?;
        Ok((limit, offset))
    }
}
