use crate::error::RelayError;
use axum::{
    extract::Request,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_HEADERS, ORIGIN, VARY,
        },
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

pub const EXTENSION_ORIGIN_PREFIX: &str = "chrome-extension://";
pub const PROXY_KEY_HEADER: &str = "x-proxy-key";
const PREFLIGHT_METHODS: &str = "GET,HEAD,PUT,PATCH,POST,DELETE";

/// Requests without an origin (curl, server-to-server) and requests from a
/// browser extension are allowed; everything else is a cross-origin denial.
pub fn is_origin_allowed(origin: Option<&str>) -> bool {
    match origin {
        None => true,
        Some(origin) => origin.is_empty() || origin.starts_with(EXTENSION_ORIGIN_PREFIX),
    }
}

/// Router-wide middleware enforcing the origin policy before any route runs.
pub async fn origin_guard(req: Request, next: Next) -> Response {
    let origin = match req.headers().get(ORIGIN) {
        None => None,
        Some(value) => match value.to_str() {
            Ok(origin) => Some(origin.to_string()),
            Err(_) => {
                return RelayError::OriginNotAllowed {
                    origin: String::from_utf8_lossy(value.as_bytes()).into_owned(),
                }
                .into_response()
            }
        },
    };

    if !is_origin_allowed(origin.as_deref()) {
        return RelayError::OriginNotAllowed {
            origin: origin.unwrap_or_default(),
        }
        .into_response();
    }

    let allow_origin = origin
        .filter(|o| !o.is_empty())
        .and_then(|o| HeaderValue::from_str(&o).ok());

    if req.method() == Method::OPTIONS {
        debug!(path = %req.uri().path(), "Answering CORS preflight");
        let mut response = StatusCode::NO_CONTENT.into_response();
        let headers = response.headers_mut();
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(PREFLIGHT_METHODS),
        );
        if let Some(requested) = req.headers().get(ACCESS_CONTROL_REQUEST_HEADERS) {
            headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, requested.clone());
            headers.append(VARY, HeaderValue::from_static("Access-Control-Request-Headers"));
        }
        apply_allow_origin(headers, allow_origin);
        return response;
    }

    let mut response = next.run(req).await;
    apply_allow_origin(response.headers_mut(), allow_origin);
    response
}

fn apply_allow_origin(headers: &mut HeaderMap, allow_origin: Option<HeaderValue>) {
    if let Some(origin) = allow_origin {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.append(VARY, HeaderValue::from_static("Origin"));
    }
}

/// Checks the caller-supplied `x-proxy-key` against the configured secret.
pub fn authenticate_proxy_key(headers: &HeaderMap, expected: &str) -> Result<(), RelayError> {
    let supplied = headers
        .get(PROXY_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match supplied {
        Some(key) if key == expected => Ok(()),
        _ => Err(RelayError::InvalidProxyKey),
    }
}
