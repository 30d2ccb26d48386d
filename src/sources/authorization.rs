use reqwest::{Client, Url};
use tracing::warn;

use crate::errors::{UpstreamAuthError, UpstreamFailure};
use crate::sources::speech_client::ServiceCredentials;
use crate::sources::FetchToken;
use crate::utils::constants::{AUTHORIZATION_PATH, AUTHORIZATION_URL_DEFAULT};
use crate::utils::upstream::{read_text, send_checked};

/// Exchanges service username/password for a token at the authorization service.
#[derive(Debug, Clone)]
pub struct AuthorizationTokenManager {
    client: Client,
    credentials: ServiceCredentials,
    authorization_url: String,
}

impl AuthorizationTokenManager {
    pub fn from_credentials(client: Client, credentials: ServiceCredentials) -> Self {
        let authorization_url = authorization_url_for(&credentials.url);
        Self {
            client,
            credentials,
            authorization_url,
        }
    }

    pub fn authorization_url(&self) -> &str {
        &self.authorization_url
    }
}

impl FetchToken for AuthorizationTokenManager {
    async fn fetch_token(&self) -> Result<String, UpstreamAuthError> {
        let token_url = format!("{}/v1/token", self.authorization_url);
        let request = self
            .client
            .get(&token_url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .query(&[("url", self.credentials.url.as_str())]);

        let response = send_checked(request, &token_url).await?;
        let token = read_text(response, &token_url).await?.trim().to_owned();

        if token.is_empty() {
            return Err(UpstreamFailure::Decode {
                url: token_url,
                reason: "empty token".to_owned(),
            }
            .into());
        }
        Ok(token)
    }
}

/// The authorization service lives next to the speech service on the same origin.
pub fn authorization_url_for(service_url: &str) -> String {
    match Url::parse(service_url) {
        Ok(url) if url.has_host() => {
            format!("{}{}", url.origin().ascii_serialization(), AUTHORIZATION_PATH)
        }
        _ => {
            warn!(
                "cannot derive authorization url from '{}', using {}",
                service_url, AUTHORIZATION_URL_DEFAULT
            );
            AUTHORIZATION_URL_DEFAULT.to_owned()
        }
    }
}
