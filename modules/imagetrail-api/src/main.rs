use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::HeaderValue,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use imagetrail_common::Config;
use vision_client::VisionClient;

mod error;
mod rest;

pub struct AppState {
    /// Present only when a Vision API key is configured; requests fail fast
    /// with a structured error otherwise.
    pub vision: Option<VisionClient>,
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("imagetrail=info".parse()?))
        .init();

    let config = Config::from_env();

    let state = Arc::new(AppState {
        vision: config.vision_api_key.clone().map(VisionClient::new),
    });

    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:5173".parse::<HeaderValue>()?,
            "http://127.0.0.1:5173".parse::<HeaderValue>()?,
        ])
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(health))
        .route("/spread", post(rest::spread::spread_from_image))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr, "imagetrail API listening");

    axum::serve(listener, app).await?;
    Ok(())
}
