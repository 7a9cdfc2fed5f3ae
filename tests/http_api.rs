//! End-to-end tests of the REST API.
//!
//! Each test serves the router on an ephemeral port, backed by a temporary
//! SQLite file and a `wiremock` catalog, and drives it with `reqwest`.

#![allow(clippy::panic, clippy::indexing_slicing)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use shopchat_gateway::api;
use shopchat_gateway::app_state::AppState;
use shopchat_gateway::catalog::CatalogClient;
use shopchat_gateway::config::{CatalogConfig, StoreConfig};
use shopchat_gateway::persistence::ConversationStore;
use shopchat_gateway::service::SessionService;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestServer {
    base: String,
    http: reqwest::Client,
    store: ConversationStore,
    catalog: MockServer,
    dir: TempDir,
}

impl TestServer {
    async fn start() -> Self {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let Ok(store) = ConversationStore::connect(&StoreConfig::new(dir.path().join("api.db"))).await
        else {
            panic!("store should open");
        };

        let catalog = MockServer::start().await;
        let mut config = CatalogConfig::new(catalog.uri(), "sf-token", "admin-token");
        config.timeout = Duration::from_secs(5);
        let Ok(client) = CatalogClient::new(config) else {
            panic!("catalog client should build");
        };

        let state = AppState {
            session_service: Arc::new(SessionService::new(store.clone())),
            catalog: Arc::new(client),
        };
        let app = api::build_router().with_state(state);

        let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
            panic!("bind failed");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("no local addr");
        };
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base: base_url(addr),
            http: reqwest::Client::new(),
            store,
            catalog,
            dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn get(&self, path: &str) -> (u16, Value) {
        let Ok(resp) = self.http.get(self.url(path)).send().await else {
            panic!("GET {path} failed");
        };
        read(resp).await
    }

    async fn post(&self, path: &str, body: &Value) -> (u16, Value) {
        let Ok(resp) = self.http.post(self.url(path)).json(body).send().await else {
            panic!("POST {path} failed");
        };
        read(resp).await
    }

    async fn create_session(&self) -> String {
        let (status, body) = self.post("/api/sessions", &json!({})).await;
        assert_eq!(status, 201);
        let Some(id) = body["session_id"].as_str() else {
            panic!("session_id missing: {body}");
        };
        id.to_string()
    }
}

fn base_url(addr: SocketAddr) -> String {
    format!("http://{addr}")
}

async fn read(resp: reqwest::Response) -> (u16, Value) {
    let status = resp.status().as_u16();
    let Ok(text) = resp.text().await else {
        panic!("body unreadable");
    };
    let body = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };
    (status, body)
}

#[tokio::test]
async fn health_reports_version() {
    let server = TestServer::start().await;
    let (status, body) = server.get("/api/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn conversation_lifecycle() {
    let server = TestServer::start().await;

    let Ok(resp) = server.http.post(server.url("/api/sessions")).send().await else {
        panic!("create without body failed");
    };
    assert_eq!(resp.status().as_u16(), 201);

    let (status, body) = server
        .post(
            "/api/sessions",
            &json!({ "metadata": { "channel": "web", "locale": "en" } }),
        )
        .await;
    assert_eq!(status, 201);
    let Some(id) = body["session_id"].as_str().map(str::to_string) else {
        panic!("session_id missing");
    };

    for (role, content) in [("user", "hi"), ("assistant", "hello!")] {
        let (status, body) = server
            .post(
                &format!("/api/sessions/{id}/messages"),
                &json!({ "role": role, "content": content }),
            )
            .await;
        assert_eq!(status, 201);
        assert!(body["message_id"].is_i64());
    }

    let (status, detail) = server.get(&format!("/api/sessions/{id}")).await;
    assert_eq!(status, 200);
    assert_eq!(detail["status"], "active");
    assert_eq!(detail["metadata"], json!({ "channel": "web", "locale": "en" }));
    assert_eq!(detail["messages"][0]["role"], "user");
    assert_eq!(detail["messages"][1]["content"], "hello!");

    let (status, messages) = server.get(&format!("/api/sessions/{id}/messages")).await;
    assert_eq!(status, 200);
    assert_eq!(messages.as_array().map(Vec::len), Some(2));

    let (status, list) = server.get("/api/sessions").await;
    assert_eq!(status, 200);
    assert_eq!(list.as_array().map(Vec::len), Some(2));
    assert_eq!(list[0]["session_id"], id.as_str());
    assert_eq!(list[0]["message_count"], 2);

    let Ok(resp) = server
        .http
        .delete(server.url(&format!("/api/sessions/{id}")))
        .send()
        .await
    else {
        panic!("delete failed");
    };
    assert_eq!(resp.status().as_u16(), 204);

    let (status, detail) = server.get(&format!("/api/sessions/{id}")).await;
    assert_eq!(status, 200);
    assert_eq!(detail["status"], "ended");

    let (status, _) = server
        .post(
            &format!("/api/sessions/{id}/messages"),
            &json!({ "role": "user", "content": "still there?" }),
        )
        .await;
    assert_eq!(status, 400);

    let (_, list) = server.get("/api/sessions").await;
    assert_eq!(list.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn unknown_session_is_404_with_error_body() {
    let server = TestServer::start().await;
    let ghost = "00000000-0000-4000-8000-000000000000";

    let (status, body) = server.get(&format!("/api/sessions/{ghost}")).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], 2001);

    let (status, _) = server
        .post(
            &format!("/api/sessions/{ghost}/events"),
            &json!({ "event_type": "cart_opened" }),
        )
        .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn out_of_range_pagination_is_rejected() {
    let server = TestServer::start().await;
    for query in ["limit=0", "limit=101", "offset=-1"] {
        let (status, body) = server.get(&format!("/api/sessions?{query}")).await;
        assert_eq!(status, 400, "{query}");
        assert_eq!(body["error"]["code"], 1001);
    }
}

#[tokio::test]
async fn events_are_accepted() {
    let server = TestServer::start().await;
    let id = server.create_session().await;

    let (status, _) = server
        .post(
            &format!("/api/sessions/{id}/events"),
            &json!({ "event_type": "cart_opened", "event_data": { "items": 2 } }),
        )
        .await;
    assert_eq!(status, 202);
}

#[tokio::test]
async fn product_search_proxies_the_catalog() {
    let server = TestServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "variables": { "query": "boots", "first": 5 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "products": { "edges": [{ "node": {
                "id": "gid://shopify/Product/9",
                "title": "Hiking Boot",
                "priceRange": { "minVariantPrice": { "amount": "80.00", "currencyCode": "EUR" } }
            }}]}}
        })))
        .mount(&server.catalog)
        .await;

    let (status, body) = server.get("/api/products/search?q=boots").await;
    assert_eq!(status, 200);
    assert_eq!(body[0]["id"], "gid://shopify/Product/9");
    assert_eq!(body[0]["price"], "80.00");
    assert_eq!(body[0]["vendor"], "");
    assert!(body[0]["image_url"].is_null());

    for query in ["q=%20", "limit=3", "q=boots&limit=-1", "q=boots&limit=51"] {
        let (status, body) = server.get(&format!("/api/products/search?{query}")).await;
        assert_eq!(status, 400, "{query}");
        assert_eq!(body["error"]["code"], 1001, "{query}");
    }
}

#[tokio::test]
async fn product_view_is_recorded_for_the_session() {
    let server = TestServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "variables": { "id": "gid://shopify/Product/9" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "product": {
                "id": "gid://shopify/Product/9",
                "title": "Hiking Boot",
                "priceRange": { "minVariantPrice": { "amount": "80.00", "currencyCode": "EUR" } }
            }}
        })))
        .mount(&server.catalog)
        .await;
    let id = server.create_session().await;

    let (status, body) = server
        .get(&format!(
            "/api/products/gid%3A%2F%2Fshopify%2FProduct%2F9?session_id={id}"
        ))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["title"], "Hiking Boot");

    let Ok(pool) = sqlx::SqlitePool::connect_with(
        sqlx::sqlite::SqliteConnectOptions::new().filename(server.dir.path().join("api.db")),
    )
    .await
    else {
        panic!("direct connection failed");
    };
    let row: Result<(String, String), _> =
        sqlx::query_as("SELECT event_type, event_data FROM events WHERE session_id = ?")
            .bind(&id)
            .fetch_one(&pool)
            .await;
    let Ok((event_type, event_data)) = row else {
        panic!("event row expected");
    };
    assert_eq!(event_type, "product_viewed");
    assert!(event_data.contains("gid://shopify/Product/9"));
    pool.close().await;
    server.store.close().await;
}

#[tokio::test]
async fn product_view_for_unknown_session_still_returns_product() {
    let server = TestServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "product": {
                "id": "gid://shopify/Product/9",
                "title": "Hiking Boot",
                "priceRange": { "minVariantPrice": { "amount": "80.00", "currencyCode": "EUR" } }
            }}
        })))
        .mount(&server.catalog)
        .await;
    let ghost = "00000000-0000-4000-8000-000000000000";

    let (status, body) = server
        .get(&format!(
            "/api/products/gid%3A%2F%2Fshopify%2FProduct%2F9?session_id={ghost}"
        ))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["id"], "gid://shopify/Product/9");

    let (status, _) = server.get(&format!("/api/sessions/{ghost}")).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn missing_product_is_404() {
    let server = TestServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "product": null } })))
        .mount(&server.catalog)
        .await;

    let (status, body) = server
        .get("/api/products/gid%3A%2F%2Fshopify%2FProduct%2F404")
        .await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], 2002);
}

#[tokio::test]
async fn catalog_outage_is_502() {
    let server = TestServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server.catalog)
        .await;

    let (status, body) = server.get("/api/products/search?q=boots").await;
    assert_eq!(status, 502);
    assert_eq!(body["error"]["code"], 3002);
}
