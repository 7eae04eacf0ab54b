use std::io;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{debug, error};

/// Errors raised while serving a proxied request.
#[derive(Debug)]
pub enum ProxyError {
    Io(io::Error),
    BadRequest(String),
    Unauthorized,
    NotFound,
    InvalidUrl(String),
    Upstream(reqwest::Error),
    Status(u16),
    Decode(String),
}

impl ProxyError {
    /// HTTP status the client sees for this error.
    pub fn status(&self) -> u16 {
        match self {
            ProxyError::BadRequest(_) => 400,
            ProxyError::Unauthorized => 401,
            ProxyError::NotFound => 404,
            ProxyError::Io(_)
            | ProxyError::InvalidUrl(_)
            | ProxyError::Upstream(_)
            | ProxyError::Status(_)
            | ProxyError::Decode(_) => 500,
        }
    }

    /// Message placed in the `error` field of the response body.
    ///
    /// Server-side failures are not described to the client; they are logged instead.
    pub fn client_message(&self) -> String {
        match self {
            ProxyError::BadRequest(msg) => msg.clone(),
            ProxyError::Unauthorized => "Authentication failed".to_string(),
            ProxyError::NotFound => "Not Found".to_string(),
            _ => "Internal Server Error".to_string(),
        }
    }

    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            ProxyError::Upstream(_) | ProxyError::Status(_) | ProxyError::Decode(_)
        )
    }
}

impl std::fmt::Display for ProxyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProxyError::Io(e) => write!(f, "I/O error: {}", e),
            ProxyError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ProxyError::Unauthorized => write!(f, "Authentication failed"),
            ProxyError::NotFound => write!(f, "Not found"),
            ProxyError::InvalidUrl(e) => write!(f, "Invalid upstream URL: {}", e),
            ProxyError::Upstream(e) => write!(f, "Upstream request failed: {}", e),
            ProxyError::Status(code) => write!(f, "Upstream returned HTTP {}", code),
            ProxyError::Decode(e) => write!(f, "Cannot decode upstream response: {}", e),
        }
    }
}

impl std::error::Error for ProxyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProxyError::Io(e) => Some(e),
            ProxyError::Upstream(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ProxyError {
    fn from(e: io::Error) -> Self {
        ProxyError::Io(e)
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(e: reqwest::Error) -> Self {
        ProxyError::Upstream(e)
    }
}

impl From<url::ParseError> for ProxyError {
    fn from(e: url::ParseError) -> Self {
        ProxyError::InvalidUrl(e.to_string())
    }
}

/// Response extension set on errors caused by the upstream API.
#[derive(Debug, Clone, Copy)]
pub struct UpstreamFailure;

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!("{}", self);
        } else {
            debug!(status = status.as_u16(), "{}", self);
        }

        let body = Json(json!({ "error": self.client_message() }));
        let mut response = (status, body).into_response();
        if self.is_upstream() {
            response.extensions_mut().insert(UpstreamFailure);
        }
        response
    }
}
