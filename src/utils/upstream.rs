use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::errors::UpstreamFailure;

/// Send the request and keep the response only if the status is a success.
pub async fn send_checked(request: RequestBuilder, url: &str) -> Result<Response, UpstreamFailure> {
    let response = request.send().await.map_err(|source| UpstreamFailure::Transport {
        url: url.to_owned(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(UpstreamFailure::Status {
            url: url.to_owned(),
            status,
            body,
        });
    }
    Ok(response)
}

pub async fn read_text(response: Response, url: &str) -> Result<String, UpstreamFailure> {
    response.text().await.map_err(|source| UpstreamFailure::Transport {
        url: url.to_owned(),
        source,
    })
}

pub async fn read_json<T: DeserializeOwned>(response: Response, url: &str) -> Result<T, UpstreamFailure> {
    let body = read_text(response, url).await?;
    serde_json::from_str(&body).map_err(|e| UpstreamFailure::Decode {
        url: url.to_owned(),
        reason: e.to_string(),
    })
}
