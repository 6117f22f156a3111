//! HTTP server implementation using Axum.

use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use ansimbot_core::config::AnsimConfig;
use ansimbot_engine::Engine;

/// Shared state for the gateway server.
///
/// `engine` is `None` when the knowledge base failed to initialize at
/// startup; the server still comes up and reports degraded so the corpus
/// can be fixed without losing the process.
pub struct AppState {
    pub engine: Option<Arc<Engine>>,
    pub model: String,
    pub allowed_origins: Vec<String>,
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .allow_origin(
            state
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok())
                .collect::<Vec<_>>(),
        )
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/", get(super::routes::index))
        .route("/chat", post(super::routes::chat))
        .route("/api/v1/health", get(super::routes::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the HTTP server.
pub async fn start(config: &AnsimConfig, engine: Option<Arc<Engine>>) -> anyhow::Result<()> {
    let state = AppState {
        engine,
        model: config.model.clone(),
        allowed_origins: config.gateway.allowed_origins.clone(),
    };
    let app = build_router(state);

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🌐 Gateway server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
