use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Why a single upstream round trip failed.
#[derive(Debug, Error)]
pub enum UpstreamFailure {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl UpstreamFailure {
    /// Short label used for the failure metric.
    pub fn reason(&self) -> &'static str {
        match self {
            UpstreamFailure::Transport { .. } => "transport",
            UpstreamFailure::Status { .. } => "status",
            UpstreamFailure::Decode { .. } => "decode",
        }
    }
}

/// Token fetch failed (network error, invalid credentials, upstream error).
#[derive(Debug, Error)]
#[error("token fetch failed: {0}")]
pub struct UpstreamAuthError(#[from] pub UpstreamFailure);

/// Tone analysis failed.
#[derive(Debug, Error)]
pub enum UpstreamToneError {
    #[error("tone analyzer authentication failed: {0}")]
    Auth(#[from] UpstreamAuthError),

    #[error("tone analysis failed: {0}")]
    Request(#[from] UpstreamFailure),
}

impl UpstreamToneError {
    pub fn reason(&self) -> &'static str {
        match self {
            UpstreamToneError::Auth(_) => "auth",
            UpstreamToneError::Request(failure) => failure.reason(),
        }
    }
}

/// Generic error handler for the HTTP routes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Token(#[from] UpstreamAuthError),

    #[error(transparent)]
    Tone(#[from] UpstreamToneError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        tracing::error!("request failed: {}", self);

        let body = Json(json!({
            "error": self.to_string(),
            "code": status.as_u16()
        }));
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
