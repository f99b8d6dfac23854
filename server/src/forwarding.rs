use crate::error::RelayError;
use crate::{access_control, AppState};
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;
use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// True for `application/json`, with or without parameters such as `charset`.
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}

/// Interprets the inbound body as opaque JSON.
///
/// Bodies not declared as JSON, and empty bodies, become `{}`. Key order is
/// kept as sent.
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<Value, RelayError> {
    if !is_json_content_type(content_type) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    Ok(serde_json::from_slice(body)?)
}

/// Sends `payload` to the upstream with the server-held bearer credential.
///
/// Success yields the upstream's parsed JSON. A non-success status becomes
/// [`RelayError::Upstream`] carrying the upstream's own JSON body; network and
/// decode failures become [`RelayError::Transport`].
pub async fn relay_to_upstream(
    http_client: &Client,
    upstream_url: &str,
    upstream_key: &str,
    payload: &Value,
) -> Result<Value, RelayError> {
    let response = http_client
        .post(upstream_url)
        .header(AUTHORIZATION, format!("Bearer {}", upstream_key))
        .header(CONTENT_TYPE, "application/json")
        .json(payload)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.json::<Value>().await?;
        return Err(RelayError::Upstream { status, body });
    }

    Ok(response.json::<Value>().await?)
}

#[axum::debug_handler]
pub async fn analyze_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, RelayError> {
    access_control::authenticate_proxy_key(&headers, &app_state.config.proxy_key)?;

    let body = body?;
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let payload = parse_body(content_type, &body)?;
    info!("Received analysis request");

    let data = relay_to_upstream(
        &app_state.http_client,
        &app_state.config.upstream_url,
        &app_state.config.upstream_key,
        &payload,
    )
    .await?;

    info!("Successfully processed request");
    Ok(Json(data))
}
