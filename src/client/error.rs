//! Client Error Types
//!
//! Every failure of a backend call collapses into a single error kind
//! carrying the best-effort human-readable message.

use crate::responses::truthy_text;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Errors returned by [`ApiClient`](super::ApiClient) operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request failed: transport error, non-2xx status, or a body
    /// that could not be decoded
    #[error("{0}")]
    RequestFailed(String),
}

impl ApiError {
    /// The message carried by the error
    pub fn message(&self) -> &str {
        match self {
            ApiError::RequestFailed(message) => message,
        }
    }

    /// Build the error for a non-2xx response from its raw body.
    ///
    /// The message is `detail` when present, else `message`, else the
    /// status text.
    pub(crate) fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let from_body = serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|payload| error_field(&payload, "detail").or_else(|| error_field(&payload, "message")));

        ApiError::RequestFailed(from_body.unwrap_or_else(|| status_text(status)))
    }

    pub(crate) fn transport(err: reqwest::Error) -> Self {
        ApiError::RequestFailed(err.to_string())
    }

    pub(crate) fn decode(err: serde_json::Error) -> Self {
        ApiError::RequestFailed(format!("Invalid JSON response: {}", err))
    }
}

/// Extract a message field from an error payload.
///
/// FastAPI validation failures put a list of objects under `detail`, so
/// non-string values are rendered as compact JSON rather than dropped.
/// Falsy values (`false`, `0`, empty string/array/object) are skipped.
fn error_field(payload: &Value, field: &str) -> Option<String> {
    payload.get(field).and_then(truthy_text)
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}

/// Result type for client operations
pub type ApiResult<T> = Result<T, ApiError>;
