use crate::models::ErrorBody;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use thiserror::Error;
use tracing::error;

/// Every way a request can fail. Each variant knows its HTTP status and body.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Invalid proxy key")]
    InvalidProxyKey,

    #[error("Not allowed by CORS")]
    OriginNotAllowed { origin: String },

    /// The upstream answered with a non-success status; its body is relayed as-is.
    #[error("upstream responded with {status}")]
    Upstream { status: StatusCode, body: Value },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    MalformedBody(#[from] serde_json::Error),

    /// The inbound body could not be buffered, e.g. it exceeds the size limit.
    #[error("{0}")]
    UnreadableBody(#[from] BytesRejection),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidProxyKey => StatusCode::FORBIDDEN,
            Self::Upstream { status, .. } => *status,
            Self::OriginNotAllowed { .. }
            | Self::Transport(_)
            | Self::MalformedBody(_)
            | Self::UnreadableBody(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::InvalidProxyKey => {
                error!("Invalid proxy key");
                (status, Json(ErrorBody::new(self.to_string()))).into_response()
            }
            Self::OriginNotAllowed { ref origin } => {
                error!(origin = %origin, "Rejected request from disallowed origin");
                (status, Json(ErrorBody::internal(self.to_string()))).into_response()
            }
            Self::Upstream { status, body } => {
                error!(status = %status, error = %body, "Upstream API error");
                (status, Json(body)).into_response()
            }
            Self::Transport(ref e) => {
                error!(error = ?e, "Server error while contacting upstream");
                (status, Json(ErrorBody::internal(self.to_string()))).into_response()
            }
            Self::MalformedBody(ref e) => {
                error!(error = %e, "Unhandled error: malformed request body");
                (status, Json(ErrorBody::internal(self.to_string()))).into_response()
            }
            Self::UnreadableBody(ref e) => {
                error!(error = %e, "Unhandled error: unreadable request body");
                (status, Json(ErrorBody::internal(self.to_string()))).into_response()
            }
        }
    }
}
