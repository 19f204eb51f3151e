//! Router assembly and serving

use axum::extract::DefaultBodyLimit;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;

use crate::config::ProxyConfig;
use crate::handler::{chat, ProxyState};
use crate::Result;

pub fn router(config: &ProxyConfig) -> Router {
    let state = ProxyState {
        client: reqwest::Client::new(),
        webhook_url: Arc::from(config.webhook_url.as_str()),
        body_limit: config.body_limit,
    };

    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat))
        .layer(DefaultBodyLimit::max(config.body_limit))
        .with_state(state)
}

pub async fn serve(config: ProxyConfig) -> Result<()> {
    if config.webhook_url.is_empty() {
        tracing::warn!("N8N_WEBHOOK_URL is not set; chat requests will fail");
    }

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    let app = router(&config);

    tracing::info!(webhook = %config.webhook_url, "chat proxy listening on http://{local_addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok"
    }))
}
