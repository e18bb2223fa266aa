use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::telemetry::{HttpTelemetrySource, IntervalScheduler, SystemClock, TelemetryPoller};

use super::api::error::not_found;
use super::api::scene as scene_handlers;
use super::api::track as track_handlers;
use super::api_doc::ApiDoc;
use super::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Track API endpoints
        .route("/api/track", get(track_handlers::status))
        .route("/api/track/mode", get(track_handlers::mode))
        // Scene API endpoints
        .route("/api/scene", get(scene_handlers::scene))
        .route("/api/sun", get(scene_handlers::sun))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();
    let poller_config = config.telemetry.poller_config();

    let source = HttpTelemetrySource::new(&config.telemetry.url, poller_config.fetch_timeout)
        .map_err(std::io::Error::other)?;
    let clock = Arc::new(SystemClock);
    let mut poller = TelemetryPoller::new(
        Arc::new(source),
        Arc::new(IntervalScheduler),
        clock.clone(),
        poller_config,
    );
    poller.start().map_err(std::io::Error::other)?;

    let state = AppState {
        config: Arc::new(config),
        poller: Arc::new(Mutex::new(poller)),
        clock,
    };
    let app = router(state.clone());

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    state.poller.lock().await.stop().await;
    served
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown requested");
}
