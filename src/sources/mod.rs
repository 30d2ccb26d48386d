//! Sources module
//!
//! The two ways of obtaining a speech streaming token and the selector that
//! binds one of them at startup.

use reqwest::Client;

use crate::config::credentials::Credentials;
use crate::errors::UpstreamAuthError;

pub mod authorization;
pub mod iam;
pub mod speech_client;

use authorization::AuthorizationTokenManager;
use iam::IamTokenManager;
use speech_client::SpeechToTextClient;

pub trait FetchToken {
    fn fetch_token(
        &self,
    ) -> impl std::future::Future<Output = Result<String, UpstreamAuthError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Iam,
    Legacy,
}

impl AuthMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMode::Iam => "iam",
            AuthMode::Legacy => "cf",
        }
    }
}

#[derive(Debug, Clone)]
pub enum TokenManager {
    Iam(IamTokenManager),
    Legacy(AuthorizationTokenManager),
}

impl TokenManager {
    pub fn mode(&self) -> AuthMode {
        match self {
            TokenManager::Iam(_) => AuthMode::Iam,
            TokenManager::Legacy(_) => AuthMode::Legacy,
        }
    }
}

impl FetchToken for TokenManager {
    async fn fetch_token(&self) -> Result<String, UpstreamAuthError> {
        match self {
            TokenManager::Iam(manager) => manager.fetch_token().await,
            TokenManager::Legacy(manager) => manager.fetch_token().await,
        }
    }
}

/// Bind the token manager matching the configured credentials.
pub fn select(credentials: &Credentials, client: &Client) -> TokenManager {
    match credentials {
        Credentials::Iam { api_key, iam_url } => TokenManager::Iam(IamTokenManager::new(
            client.clone(),
            api_key.to_owned(),
            iam_url.to_owned(),
        )),
        Credentials::Legacy {
            username,
            password,
            service_url,
        } => {
            let speech = SpeechToTextClient::new(client.clone(), username, password, service_url);
            TokenManager::Legacy(AuthorizationTokenManager::from_credentials(
                speech.http_client().clone(),
                speech.credentials(),
            ))
        }
    }
}
