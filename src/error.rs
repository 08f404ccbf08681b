//! Error types for the proxy server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Proxy Error Enum ==
/// Errors raised by the proxy layer itself.
///
/// Upstream failures are not represented here: the fetcher folds them into
/// fallback payloads before they reach a handler.
#[derive(Error, Debug, PartialEq)]
pub enum ProxyError {
    /// The request path cannot be turned into a cache key
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },

    /// A query parameter cannot be turned into a cache key
    #[error("Invalid query parameter '{name}': {reason}")]
    InvalidQueryParam { name: String, reason: &'static str },

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProxyError::InvalidPath { .. } | ProxyError::InvalidQueryParam { .. } => {
                StatusCode::BAD_REQUEST
            }
            ProxyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "success": false,
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

// == Upstream Error Enum ==
/// Ways an upstream call can fail.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Connection or protocol failure
    #[error("Upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// No response within the configured timeout
    #[error("Upstream request timed out")]
    Timeout,

    /// Upstream answered with a non-success HTTP status
    #[error("Upstream returned status {0}")]
    Status(u16),

    /// Body was not valid JSON
    #[error("Failed to decode upstream response: {0}")]
    Decode(String),

    /// Payload was received but reports failure or carries no data
    #[error("Upstream reported failure: {0}")]
    Logical(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else if err.is_decode() {
            UpstreamError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            UpstreamError::Status(status.as_u16())
        } else {
            UpstreamError::Transport(err)
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the proxy server.
pub type Result<T> = std::result::Result<T, ProxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_path_is_bad_request() {
        let err = ProxyError::InvalidPath {
            path: "home".to_string(),
            reason: "must start with '/'",
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid path 'home': must start with '/'");
    }

    #[test]
    fn test_internal_is_server_error() {
        let response = ProxyError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_upstream_error_messages() {
        assert_eq!(UpstreamError::Timeout.to_string(), "Upstream request timed out");
        assert_eq!(
            UpstreamError::Status(503).to_string(),
            "Upstream returned status 503"
        );
    }
}
