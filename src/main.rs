mod adapter;
mod config;
mod errors;
mod handlers;
mod models;
mod provider_client;
mod webhook_models;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::adapter::BackgroundCheckAdapter;
use crate::config::Config;
use crate::handlers::AppState;
use crate::provider_client::RestProviderClient;

/// Main entry point for the application.
///
/// Initializes logging and tracing, loads configuration, constructs the
/// single provider adapter for this deployment, and starts the Axum server
/// with CORS, request tracing, body-size limiting and rate limiting.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_bgc_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize the provider adapter for this deployment.
    // Swapping providers means constructing a different adapter here.
    let adapter = RestProviderClient::new(
        config.provider_base_url.clone(),
        config.provider_api_key.clone(),
        config.provider_webhook_secret.clone(),
    )?;
    tracing::info!(
        "Provider adapter initialized: {} -> {}",
        adapter.name(),
        config.provider_base_url
    );

    // Build application state
    let app_state = Arc::new(AppState {
        config: config.clone(),
        adapter: Arc::new(adapter),
    });

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );

    // Build protected routes with security layers
    let protected_routes = Router::new()
        .route("/create_check", post(handlers::create_check))
        .route("/get_check", post(handlers::get_check))
        .route("/webhook", post(handlers::webhook))
        .route("/external_health", get(handlers::external_health))
        .layer(
            ServiceBuilder::new()
                // Request size limit: 1MB max payload
                .layer(RequestBodyLimitLayer::new(1024 * 1024))
                // Rate limiting: 10 req/sec per IP, burst of 20
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    // Build final app with liveness check bypassing rate limiting
    let app = Router::new()
        .route("/healthz", get(handlers::healthz))
        .merge(protected_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
