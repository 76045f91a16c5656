//! Error types for the objects API client.
//!
//! # Design
//! Every layer propagates failures upward unchanged, so a single `ApiError`
//! covers the whole stack. Non-2xx responses land in `HttpStatus` with the
//! raw status code and body; callers that care about "the resource does not
//! exist" ask `is_not_found()` instead of matching on a dedicated variant.

use std::time::Duration;

/// Errors returned by the transport, resource client and page facade.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The client configuration is missing or invalid.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The request never produced a response (DNS, connect, TLS, I/O).
    #[error("transport failure: {0}")]
    Transport(#[source] ureq::Error),

    /// The request could not be assembled (bad header name or value, bad URI).
    #[error("invalid request: {0}")]
    InvalidRequest(#[source] ureq::http::Error),

    /// The request exceeded its timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The server answered with a status code of 400 or above.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The response body could not be decoded as JSON.
    #[error("deserialization failed: {0}")]
    Decoding(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl ApiError {
    /// The HTTP status carried by an `HttpStatus` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the server answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Errors raised while resolving a [`Config`](crate::Config).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid timeout {0:?}: expected a positive number of seconds")]
    InvalidTimeout(String),

    #[error("invalid response size limit {0:?}: expected a number of bytes")]
    InvalidResponseSize(String),

    #[error("API key contains invalid characters")]
    InvalidApiKey,
}

/// Errors raised while loading a test-data fixture.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("failed to read fixture")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON fixture")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML fixture")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported fixture format: {0:?}")]
    UnsupportedFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_display_includes_status_and_body() {
        let err = ApiError::HttpStatus {
            status: 500,
            body: "internal error".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 500: internal error");
        assert_eq!(err.status(), Some(500));
        assert!(!err.is_not_found());
    }

    #[test]
    fn not_found_is_detected_from_status() {
        let err = ApiError::HttpStatus {
            status: 404,
            body: String::new(),
        };
        assert!(err.is_not_found());
    }

    #[test]
    fn non_status_errors_have_no_status() {
        let err = ApiError::Timeout(Duration::from_secs(1));
        assert_eq!(err.status(), None);
        assert!(!err.is_not_found());
    }
}
