//! Error types for the createsend client.
//!
//! # Design
//! A 400 response is the only status the API documents as carrying a
//! machine-readable body, so it gets a dedicated `Api` variant holding the
//! decoded `CreatesendError`. Every other non-2xx status lands in `Http` with
//! only the status code; the body is logged (when enabled) and dropped.

use serde::{Deserialize, Serialize};

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

/// Structured error returned by the API with HTTP 400.
///
/// `result_data` carries endpoint-specific detail, e.g. the failure report of
/// a webhook test.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "PascalCase")]
#[error("{message} (createsend error {code})")]
pub struct CreatesendError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_data: Option<serde_json::Value>,
}

/// Failure of the underlying transport: network, DNS, TLS, timeout.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(transparent)]
    Ureq(#[from] ureq::Error),

    /// Raised by custom `Transport` implementations.
    #[error("{0}")]
    Other(String),
}

/// Errors returned by `ApiClient` and the endpoint methods built on it.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid request path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// The request body could not be encoded; nothing was sent.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    /// The server rejected the request with HTTP 400.
    #[error(transparent)]
    Api(#[from] CreatesendError),

    /// Any other non-2xx status.
    #[error("http response status code {status}")]
    Http { status: u16 },

    /// The response body did not match the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The response decoded but held a value of the wrong kind.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Endpoint options failed local validation; nothing was sent.
    #[error("invalid options: {0}")]
    InvalidOptions(&'static str),

    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
}

impl ApiError {
    /// The API error code, if the server rejected the request with one.
    pub fn api_code(&self) -> Option<i64> {
        match self {
            ApiError::Api(e) => Some(e.code),
            _ => None,
        }
    }

    /// The HTTP status behind the error, when one is known.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api(_) => Some(400),
            ApiError::Http { status } => Some(*status),
            _ => None,
        }
    }
}
