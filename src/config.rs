//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). The resulting [`GatewayConfig`] is built
//! once in `main` and its parts are handed to the store and catalog
//! constructors; nothing reads the environment after startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

/// Default Shopify API version used in endpoint paths.
pub const DEFAULT_API_VERSION: &str = "2025-01";

/// Default catalog request timeout.
pub const DEFAULT_CATALOG_TIMEOUT_SECS: u64 = 15;

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8000`).
    pub listen_addr: SocketAddr,

    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,

    /// Conversation store settings.
    pub store: StoreConfig,

    /// Product catalog settings.
    pub catalog: CatalogConfig,
}

/// Settings for the SQLite-backed conversation store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path of the SQLite database file. Parent directories are created.
    pub database_path: PathBuf,

    /// Maximum number of pooled connections.
    pub max_connections: u32,

    /// Timeout for acquiring a pooled connection.
    pub acquire_timeout: Duration,
}

impl StoreConfig {
    /// Creates a store configuration for `database_path` with default pool
    /// settings.
    #[must_use]
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            max_connections: 8,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Settings for the GraphQL catalog client.
#[derive(Debug)]
pub struct CatalogConfig {
    /// Base URL of the store, without trailing slash
    /// (e.g. `https://example.myshopify.com`).
    pub store_url: String,

    /// API version segment of the endpoint paths.
    pub api_version: String,

    /// Read-only Storefront API token used for product queries.
    pub storefront_token: SecretString,

    /// Admin API token, reserved for write operations.
    pub admin_token: SecretString,

    /// Fixed per-request timeout.
    pub timeout: Duration,
}

impl CatalogConfig {
    /// Creates a catalog configuration pointing at `store_url` with default
    /// API version and timeout.
    #[must_use]
    pub fn new(
        store_url: impl Into<String>,
        storefront_token: impl Into<String>,
        admin_token: impl Into<String>,
    ) -> Self {
        Self {
            store_url: store_url.into().trim_end_matches('/').to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            storefront_token: SecretString::from(storefront_token.into()),
            admin_token: SecretString::from(admin_token.into()),
            timeout: Duration::from_secs(DEFAULT_CATALOG_TIMEOUT_SECS),
        }
    }

    /// Full URL of the Storefront GraphQL endpoint.
    #[must_use]
    pub fn storefront_endpoint(&self) -> String {
        format!("{}/api/{}/graphql.json", self.store_url, self.api_version)
    }

    /// Full URL of the Admin GraphQL endpoint.
    #[must_use]
    pub fn admin_endpoint(&self) -> String {
        format!(
            "{}/admin/api/{}/graphql.json",
            self.store_url, self.api_version
        )
    }
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
            .parse()?;

        let log_json = std::env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let mut store = StoreConfig::new(
            std::env::var("SQLITE_DB_PATH").unwrap_or_else(|_| "data/store.db".to_string()),
        );
        store.max_connections = parse_env("DATABASE_MAX_CONNECTIONS", store.max_connections);
        store.acquire_timeout =
            Duration::from_secs(parse_env("DATABASE_CONNECT_TIMEOUT_SECS", 5));

        let store_domain = std::env::var("SHOPIFY_STORE_DOMAIN").unwrap_or_default();
        let store_url = std::env::var("SHOPIFY_STORE_URL")
            .unwrap_or_else(|_| format!("https://{store_domain}"));

        let mut catalog = CatalogConfig::new(
            store_url,
            std::env::var("SHOPIFY_STOREFRONT_ACCESS_TOKEN").unwrap_or_default(),
            std::env::var("SHOPIFY_ADMIN_ACCESS_TOKEN").unwrap_or_default(),
        );
        if let Ok(version) = std::env::var("SHOPIFY_API_VERSION") {
            catalog.api_version = version;
        }
        catalog.timeout = Duration::from_secs(parse_env(
            "CATALOG_TIMEOUT_SECS",
            DEFAULT_CATALOG_TIMEOUT_SECS,
        ));

        Ok(Self {
            listen_addr,
            log_json,
            store,
            catalog,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_follow_shopify_layout() {
        let cfg = CatalogConfig::new("https://demo.myshopify.com/", "sf", "admin");
        assert_eq!(
            cfg.storefront_endpoint(),
            "https://demo.myshopify.com/api/2025-01/graphql.json"
        );
        assert_eq!(
            cfg.admin_endpoint(),
            "https://demo.myshopify.com/admin/api/2025-01/graphql.json"
        );
    }

    #[test]
    fn catalog_defaults() {
        let cfg = CatalogConfig::new("http://localhost", "", "");
        assert_eq!(cfg.timeout, Duration::from_secs(15));
        assert_eq!(cfg.api_version, DEFAULT_API_VERSION);
    }

    #[test]
    fn tokens_are_redacted_in_debug_output() {
        let cfg = CatalogConfig::new("http://localhost", "storefront-secret", "admin-secret");
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("storefront-secret"));
        assert!(!debug.contains("admin-secret"));
    }

    #[test]
    fn parse_env_falls_back_on_missing_key() {
        let value: u32 = parse_env("SHOPCHAT_TEST_UNSET_VARIABLE", 7);
        assert_eq!(value, 7);
    }

    #[test]
    fn store_config_defaults() {
        let cfg = StoreConfig::new("data/test.db");
        assert_eq!(cfg.max_connections, 8);
        assert_eq!(cfg.acquire_timeout, Duration::from_secs(5));
    }
}
