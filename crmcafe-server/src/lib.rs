pub mod config;
pub mod logging;
pub mod resources;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use crmcafe_core::{HealthCheck, ServerConfig};
use crmcafe_restlette::{build_link_router, build_restlette_router};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the full Axum application from a ServerConfig.
pub fn build_app(config: ServerConfig) -> Router {
    let mut app = Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .with_state(config.health);

    for r in config.resources {
        app = app.merge(build_restlette_router(&r.path, r.table, r.repository));
    }
    for l in config.links {
        app = app.merge(build_link_router(&l.path, l.link, l.repository));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn index_handler() -> impl IntoResponse {
    Json(json!({ "message": "Welcome to CRM-Café's server" }))
}

async fn health_handler(State(health): State<Arc<dyn HealthCheck>>) -> impl IntoResponse {
    match health.ping().await {
        Ok(()) => Json(json!({ "status": "ok" })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "error" })),
            )
                .into_response()
        }
    }
}

/// Start the server on the configured port.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let port = config.port;
    let app = build_app(config);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!("crmcafe listening on port {port}");
    axum::serve(listener, app).await?;
    Ok(())
}
