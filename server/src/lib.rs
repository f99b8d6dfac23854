//! HTTP relay that forwards chat-completion requests from a browser extension
//! to the upstream API, attaching a server-held credential the extension never
//! sees.
//!
//! ```text
//! extension → POST /api/analyze (x-proxy-key: <shared secret>)
//!               ↓ origin guard, key check
//!             POST upstream (Authorization: Bearer <upstream key>)
//!               ↓
//! extension ← upstream status + JSON body
//! ```

pub mod access_control;
pub mod config;
pub mod error;
pub mod forwarding;
pub mod health;
pub mod logging;
pub mod models;

use axum::{
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use config::Config;
use models::ErrorBody;
use std::sync::Arc;

pub struct AppState {
    pub config: Config,
    pub http_client: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.upstream_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;
        Ok(Self {
            config,
            http_client,
        })
    }
}

/// Builds the full application: routes, JSON fallbacks and the origin guard.
pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/health",
            get(health::health_handler).fallback(method_not_allowed),
        )
        .route(
            "/api/analyze",
            post(forwarding::analyze_handler).fallback(method_not_allowed),
        )
        .fallback(not_found)
        .layer(middleware::from_fn(access_control::origin_guard))
        .with_state(app_state)
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("Not found")))
}

async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody::new("Method not allowed")),
    )
}
