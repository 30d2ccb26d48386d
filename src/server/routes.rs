use axum::extract::{FromRequest, Query, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde_json::{Map, Value};
use tracing::info;

use crate::broker::token_broker::TokenResponse;
use crate::errors::ApiResult;
use crate::server::server::AppState;
use crate::tone::forwarder::ToneOptions;

/// POST /api/token
pub async fn post_token(State(state): State<AppState>) -> ApiResult<Json<TokenResponse>> {
    let credentials = state.token_broker.get_token().await?;
    info!("POST api/token ({})", state.token_broker.mode().as_str());
    Ok(Json(credentials))
}

/// POST /api/tone
pub async fn post_tone(
    State(state): State<AppState>,
    Query(options): Query<ToneOptions>,
    TonePayload(payload): TonePayload,
) -> ApiResult<Json<Value>> {
    let analysis = state.tone_forwarder.analyze(&payload, &options).await?;
    Ok(Json(analysis))
}

/// Tone request body: JSON, or an urlencoded form turned into a flat JSON object.
pub struct TonePayload(pub Value);

impl<S> FromRequest<S> for TonePayload
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|content_type| content_type.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(fields) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            let object: Map<String, Value> = fields
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect();
            return Ok(TonePayload(Value::Object(object)));
        }

        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        Ok(TonePayload(value))
    }
}
