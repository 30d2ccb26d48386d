use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::credentials::SpeechConfig;
use crate::errors::UpstreamAuthError;
use crate::observability::metrics::get_metrics;
use crate::sources::{select, AuthMode, FetchToken, TokenManager};
use crate::utils::constants::UPSTREAM_SPEECH;

/// Token handed to the front-end. The field names tell it which kind of
/// credential to attach to its streaming connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenResponse {
    Iam {
        #[serde(rename = "accessToken")]
        access_token: String,
        #[serde(rename = "serviceUrl")]
        service_url: String,
    },
    Legacy {
        token: String,
        #[serde(rename = "serviceUrl")]
        service_url: String,
    },
}

/// Single "get current token" entry point over whichever manager was selected.
///
/// Every call is a fresh upstream fetch: nothing is cached, concurrent calls
/// are not coalesced and failures are not retried.
#[derive(Debug)]
pub struct TokenBroker {
    manager: TokenManager,
    service_url: String,
}

impl TokenBroker {
    pub fn new(manager: TokenManager, service_url: String) -> Self {
        Self {
            manager,
            service_url,
        }
    }

    pub fn from_config(speech: &SpeechConfig, client: &Client) -> Self {
        Self::new(select(&speech.credentials, client), speech.service_url.clone())
    }

    pub fn mode(&self) -> AuthMode {
        self.manager.mode()
    }

    pub async fn get_token(&self) -> Result<TokenResponse, UpstreamAuthError> {
        let metrics = get_metrics().await;
        let mode = self.mode();
        let start = Instant::now();
        metrics
            .upstream_requests
            .with_label_values(&[UPSTREAM_SPEECH, mode.as_str()])
            .inc();

        let fetched = self.manager.fetch_token().await;
        metrics
            .upstream_duration
            .with_label_values(&[UPSTREAM_SPEECH])
            .observe(start.elapsed().as_secs_f64());

        let token = fetched.inspect_err(|e| {
            metrics
                .upstream_failures
                .with_label_values(&[UPSTREAM_SPEECH, e.0.reason()])
                .inc();
            warn!("{} token fetch failed: {}", mode.as_str(), e);
        })?;
        debug!("{} token fetched", mode.as_str());

        Ok(self.shape(token))
    }

    fn shape(&self, token: String) -> TokenResponse {
        let service_url = self.service_url.clone();
        match self.mode() {
            AuthMode::Iam => TokenResponse::Iam {
                access_token: token,
                service_url,
            },
            AuthMode::Legacy => TokenResponse::Legacy { token, service_url },
        }
    }
}
