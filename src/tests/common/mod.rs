// tests/common/mod.rs
pub use axum::Router;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use httpmock::MockServer;
use reqwest::Client;

use crate::config::credentials::{Credentials, SpeechConfig, ToneConfig, UpstreamConfig};
use crate::config::settings::SettingsConfig;
use crate::observability::metrics::get_metrics;
use crate::server::server::{router, AppState};

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// Upstream configuration pointing every service at `upstream`.
pub fn upstream_config(upstream: &MockServer, credentials: Credentials) -> UpstreamConfig {
    UpstreamConfig {
        speech: SpeechConfig {
            service_url: upstream.url("/speech-to-text/api"),
            credentials,
        },
        tone: ToneConfig {
            url: upstream.url("/tone-analyzer/api"),
            api_key: "tone-key".to_owned(),
            iam_url: upstream.url("/identity/token"),
            version: "2017-09-21".to_owned(),
        },
        missing: Vec::new(),
    }
}

pub fn iam_credentials(upstream: &MockServer) -> Credentials {
    Credentials::Iam {
        api_key: "speech-key".to_owned(),
        iam_url: upstream.url("/identity/token"),
    }
}

pub fn legacy_credentials(upstream: &MockServer) -> Credentials {
    Credentials::Legacy {
        username: "user".to_owned(),
        password: "pass".to_owned(),
        service_url: upstream.url("/speech-to-text/api"),
    }
}

/// Start the broker against `upstream`, returning (JoinHandle, base url)
pub async fn spawn_broker(upstream: &MockServer, credentials: Credentials) -> (JoinHandle<()>, String) {
    let mut settings = SettingsConfig::default();
    settings.metrics.is_enabled = true;
    // API routes only
    settings.static_dir = "/nonexistent/public".to_owned();
    spawn_broker_with(upstream, credentials, settings).await
}

pub async fn spawn_broker_with(
    upstream: &MockServer,
    credentials: Credentials,
    settings: SettingsConfig,
) -> (JoinHandle<()>, String) {
    let config = upstream_config(upstream, credentials);
    let state = AppState::from_config(&config, &build_reqwest_client(), get_metrics().await);
    let (handle, addr) = spawn_axum(router(state, &settings)).await;
    (handle, format!("http://{}", addr))
}
