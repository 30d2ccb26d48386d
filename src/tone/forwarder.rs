use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::credentials::ToneConfig;
use crate::errors::{UpstreamAuthError, UpstreamToneError};
use crate::observability::metrics::get_metrics;
use crate::sources::iam::IamTokenManager;
use crate::sources::AuthMode;
use crate::tone::token_cache::ToneTokenCache;
use crate::utils::constants::UPSTREAM_TONE;
use crate::utils::upstream::{read_json, send_checked};

/// Optional tone analyzer query parameters passed through from `/api/tone`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToneOptions {
    pub sentences: Option<bool>,
    /// comma separated: emotion, language, social
    pub tones: Option<String>,
}

/// Relays tone analysis requests to the tone analyzer service.
///
/// The tone bearer is reused until shortly before its expiry.
#[derive(Debug)]
pub struct ToneForwarder {
    client: Client,
    tone_url: String,
    version: String,
    token_manager: IamTokenManager,
    token_cache: ToneTokenCache,
}

impl ToneForwarder {
    pub fn new(client: &Client, config: &ToneConfig) -> Self {
        Self {
            client: client.clone(),
            tone_url: format!("{}/v3/tone", config.url.trim_end_matches('/')),
            version: config.version.clone(),
            token_manager: IamTokenManager::new(
                client.clone(),
                config.api_key.clone(),
                config.iam_url.clone(),
            ),
            token_cache: ToneTokenCache::new(),
        }
    }

    pub async fn analyze(&self, payload: &Value, options: &ToneOptions) -> Result<Value, UpstreamToneError> {
        let metrics = get_metrics().await;
        let start = Instant::now();
        metrics
            .upstream_requests
            .with_label_values(&[UPSTREAM_TONE, AuthMode::Iam.as_str()])
            .inc();

        let analyzed = self.forward(payload, options).await;
        metrics
            .upstream_duration
            .with_label_values(&[UPSTREAM_TONE])
            .observe(start.elapsed().as_secs_f64());

        analyzed
            .inspect(|_| debug!("tone analysis forwarded"))
            .inspect_err(|e| {
                metrics
                    .upstream_failures
                    .with_label_values(&[UPSTREAM_TONE, e.reason()])
                    .inc();
                warn!("{}", e);
            })
    }

    async fn forward(&self, payload: &Value, options: &ToneOptions) -> Result<Value, UpstreamToneError> {
        let token = self.bearer().await?;

        let mut query = vec![("version", self.version.clone())];
        if let Some(sentences) = options.sentences {
            query.push(("sentences", sentences.to_string()));
        }
        if let Some(tones) = &options.tones {
            query.push(("tones", tones.clone()));
        }

        let request = self
            .client
            .post(&self.tone_url)
            .bearer_auth(token)
            .query(&query)
            .json(payload);

        let response = send_checked(request, &self.tone_url).await?;
        Ok(read_json(response, &self.tone_url).await?)
    }

    async fn bearer(&self) -> Result<String, UpstreamAuthError> {
        if let Some(token) = self.token_cache.get().await {
            return Ok(token);
        }
        let fresh = self.token_manager.fetch_iam_token().await?;
        let value = fresh.value.clone();
        self.token_cache.set(fresh).await;
        Ok(value)
    }
}
