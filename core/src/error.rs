//! Error types for the prediction service clients.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the model does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `HttpError` with the raw
//! status code and body for debugging.

use thiserror::Error;

/// Errors returned by the clients, transports and mock harness.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404, or a fixture lookup found nothing.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The request never produced a response (connection, timeout, I/O).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The configured base URL is unusable.
    #[error("invalid base url: {0}")]
    InvalidUrl(String),

    /// A configuration value could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The request was rejected before any I/O took place.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// HTTP status code carried by this error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable message extracted from a JSON error body.
    ///
    /// Recognizes the `detail`, `error` and `message` keys used by the
    /// different service implementations. Falls back to the raw body.
    pub fn detail(&self) -> Option<String> {
        let ApiError::HttpError { body, .. } = self else {
            return None;
        };
        let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
        let message = parsed.as_ref().and_then(|value| {
            ["detail", "error", "message"]
                .iter()
                .find_map(|key| value.get(key))
                .map(|v| match v {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
        });
        Some(message.unwrap_or_else(|| body.clone()))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::DeserializationError(e.to_string())
    }
}
