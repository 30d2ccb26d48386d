use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use reqwest::Client;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::broker::token_broker::TokenBroker;
use crate::config::credentials::UpstreamConfig;
use crate::config::settings::SettingsConfig;
use crate::observability::metrics::{get_metrics, Metrics};
use crate::observability::routes::MetricsState;
use crate::server::routes::{post_token, post_tone};
use crate::tone::forwarder::ToneForwarder;

/// Everything a request handler needs; built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub token_broker: Arc<TokenBroker>,
    pub tone_forwarder: Arc<ToneForwarder>,
    pub metrics_state: MetricsState,
}

impl AppState {
    pub fn new(token_broker: TokenBroker, tone_forwarder: ToneForwarder, metrics: &Metrics) -> Self {
        Self {
            token_broker: Arc::new(token_broker),
            tone_forwarder: Arc::new(tone_forwarder),
            metrics_state: MetricsState::new(metrics.registry.clone()),
        }
    }

    pub fn from_config(upstream: &UpstreamConfig, client: &Client, metrics: &Metrics) -> Self {
        Self::new(
            TokenBroker::from_config(&upstream.speech, client),
            ToneForwarder::new(client, &upstream.tone),
            metrics,
        )
    }
}

pub fn router(state: AppState, settings: &SettingsConfig) -> Router {
    let mut router = Router::new()
        .route("/api/token", post(post_token))
        .route(
            "/api/tone",
            post(post_tone).layer(DefaultBodyLimit::max(settings.http.body_limit_bytes)),
        )
        .merge(state.metrics_state.router(&settings.metrics));

    let static_dir = Path::new(&settings.static_dir);
    if static_dir.is_dir() {
        info!("serving static files from {}", static_dir.display());
        router = router.fallback_service(ServeDir::new(static_dir));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

pub async fn start(settings: &SettingsConfig, state: AppState) -> Result<()> {
    let app = router(state, settings);

    let bind_addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("server started at http://{}", listener.local_addr()?);

    let metrics = get_metrics().await;
    metrics.up.set(1);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    metrics.up.set(0);

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down");
}
