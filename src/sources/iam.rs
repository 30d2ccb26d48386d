use std::fmt;

use chrono::DateTime;
use http::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::errors::{UpstreamAuthError, UpstreamFailure};
use crate::sources::FetchToken;
use crate::utils::constants::{IAM_CLIENT_ID, IAM_CLIENT_SECRET, IAM_GRANT_TYPE, IAM_RESPONSE_TYPE};
use crate::utils::upstream::{read_json, send_checked};

/// Exchanges an IAM api key for a bearer token.
#[derive(Clone)]
pub struct IamTokenManager {
    client: Client,
    api_key: String,
    iam_url: String,
}

#[derive(Debug, Deserialize)]
struct IamTokenResponse {
    #[serde(default)]
    access_token: String,
    /// unix seconds
    expiration: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct IamToken {
    pub value: String,
    /// unix seconds, when the IAM service reported one
    pub expires_at: Option<i64>,
}

impl IamTokenManager {
    pub fn new(client: Client, api_key: String, iam_url: String) -> Self {
        Self {
            client,
            api_key,
            iam_url,
        }
    }

    pub fn iam_url(&self) -> &str {
        &self.iam_url
    }

    /// Exchange the api key, keeping the expiry the IAM service reported.
    pub async fn fetch_iam_token(&self) -> Result<IamToken, UpstreamAuthError> {
        let form = [
            ("grant_type", IAM_GRANT_TYPE),
            ("apikey", self.api_key.as_str()),
            ("response_type", IAM_RESPONSE_TYPE),
        ];
        let request = self
            .client
            .post(&self.iam_url)
            .basic_auth(IAM_CLIENT_ID, Some(IAM_CLIENT_SECRET))
            .header(ACCEPT, "application/json")
            .form(&form);

        let response = send_checked(request, &self.iam_url).await?;
        let body: IamTokenResponse = read_json(response, &self.iam_url).await?;

        if body.access_token.is_empty() {
            return Err(UpstreamFailure::Decode {
                url: self.iam_url.clone(),
                reason: "response has no access_token".to_owned(),
            }
            .into());
        }
        if let Some(expires_at) = body.expiration.and_then(|ts| DateTime::from_timestamp(ts, 0)) {
            debug!("iam token fetched, expires at {}", expires_at.to_rfc3339());
        }
        Ok(IamToken {
            value: body.access_token,
            expires_at: body.expiration,
        })
    }
}

impl fmt::Debug for IamTokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IamTokenManager")
            .field("iam_url", &self.iam_url)
            .finish_non_exhaustive()
    }
}

impl FetchToken for IamTokenManager {
    async fn fetch_token(&self) -> Result<String, UpstreamAuthError> {
        Ok(self.fetch_iam_token().await?.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serde_json::json;

    use crate::tests::common::build_reqwest_client;

    #[tokio::test]
    async fn exchanges_api_key_for_access_token() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/identity/token")
                .header("authorization", "Basic Yng6Yng=")
                .form_urlencoded_tuple("grant_type", IAM_GRANT_TYPE)
                .form_urlencoded_tuple("apikey", "key-1");
            then.status(200).json_body(json!({
                "access_token": "iam-abc",
                "refresh_token": "refresh",
                "token_type": "Bearer",
                "expires_in": 3600,
                "expiration": 4_102_444_800i64
            }));
        });

        let manager = IamTokenManager::new(
            build_reqwest_client(),
            "key-1".to_owned(),
            server.url("/identity/token"),
        );
        let token = manager.fetch_token().await.unwrap();

        assert_eq!(token, "iam-abc");
        mock.assert();

        let token = manager.fetch_iam_token().await.unwrap();
        assert_eq!(token.expires_at, Some(4_102_444_800));
    }

    #[tokio::test]
    async fn rejected_key_is_an_auth_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/identity/token");
            then.status(400).body("Provided API key could not be found");
        });

        let manager = IamTokenManager::new(
            build_reqwest_client(),
            "wrong".to_owned(),
            server.url("/identity/token"),
        );
        let err = manager.fetch_token().await.unwrap_err();

        match err.0 {
            UpstreamFailure::Status { status, body, .. } => {
                assert_eq!(status.as_u16(), 400);
                assert_eq!(body, "Provided API key could not be found");
            }
            other => panic!("unexpected failure {:?}", other),
        }
    }

    #[tokio::test]
    async fn placeholder_url_fails_on_first_use() {
        let manager = IamTokenManager::new(
            build_reqwest_client(),
            "key-1".to_owned(),
            "undefined var: SPEECH_TOTEXT_IAM_URL".to_owned(),
        );
        let err = manager.fetch_token().await.unwrap_err();
        assert_eq!(err.0.reason(), "transport");
    }

    #[test]
    fn debug_output_hides_api_key() {
        let manager = IamTokenManager::new(
            Client::new(),
            "secret-key".to_owned(),
            "https://iam.example/token".to_owned(),
        );
        let printed = format!("{:?}", manager);
        assert!(printed.contains("iam.example"));
        assert!(!printed.contains("secret-key"));
    }
}
