//! Error types for the proxy
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::warn;

use crate::models::ErrorResponse;

// == Upstream Error Enum ==
/// Failures talking to the upstream API, other than "not found".
///
/// Every variant is transient from the proxy's point of view: nothing is
/// cached and the caller gets a generic failure.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// The request did not complete within the configured timeout
    #[error("upstream request timed out")]
    Timeout,

    /// Upstream answered with a status other than 2xx or 404
    #[error("upstream returned status {0}")]
    Status(u16),

    /// Connection or transport failure
    #[error("upstream network error: {0}")]
    Network(String),

    /// The response body could not be read or decoded
    #[error("malformed upstream payload: {0}")]
    Decode(String),

    /// The configured base URL cannot be used to build request URLs
    #[error("invalid upstream url: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else if err.is_decode() || err.is_body() {
            UpstreamError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            UpstreamError::Status(status.as_u16())
        } else {
            UpstreamError::Network(err.to_string())
        }
    }
}

// == Proxy Error Enum ==
/// Errors surfaced by the lookup and search endpoints.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Upstream confirmed the identifier does not exist
    #[error("Pokemon not found: {0}")]
    NotFound(String),

    /// Upstream could not be reached or misbehaved
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ProxyError::NotFound(_) => (StatusCode::NOT_FOUND, "Pokemon not found".to_string()),
            ProxyError::Upstream(err) => {
                // Details stay in the log, the client gets a generic body
                warn!(error = %err, "Upstream failure surfaced to client");
                (StatusCode::BAD_GATEWAY, "Upstream request failed".to_string())
            }
            ProxyError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the proxy.
pub type Result<T> = std::result::Result<T, ProxyError>;
