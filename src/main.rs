//! shopchat-gateway server entry point.
//!
//! Opens the conversation store, builds the catalog client and serves the
//! REST API until Ctrl-C or SIGTERM.

use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use shopchat_gateway::api;
use shopchat_gateway::app_state::AppState;
use shopchat_gateway::catalog::CatalogClient;
use shopchat_gateway::config::GatewayConfig;
use shopchat_gateway::persistence::ConversationStore;
use shopchat_gateway::service::SessionService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = GatewayConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    tracing::info!(addr = %config.listen_addr, "starting shopchat-gateway");

    // Fallible setup first; the store is opened last
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;

    // Build catalog and persistence
    let catalog = Arc::new(CatalogClient::new(config.catalog)?);
    let store = ConversationStore::connect(&config.store).await?;

    // Build service layer
    let session_service = Arc::new(SessionService::new(store.clone()));

    // Build application state
    let app_state = AppState {
        session_service,
        catalog: Arc::clone(&catalog),
    };

    // Build router
    let app = Router::new().merge(api::build_router()).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );
    let app = app.with_state(app_state);

    // Start server
    tracing::info!(addr = %config.listen_addr, "server listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    if let Err(e) = &served {
        tracing::error!(error = %e, "server terminated with error");
    }

    // Release resources
    store.close().await;
    match Arc::try_unwrap(catalog) {
        Ok(catalog) => catalog.shutdown(),
        Err(_) => tracing::warn!("catalog client still shared at shutdown"),
    }
    tracing::info!("server stopped");

    served.map_err(Into::into)
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
