use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fallback message when an error response carries no usable detail.
pub const DEFAULT_ERROR_DETAIL: &str = "request failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    BadRequest,
    NotFound,
    Validation,
    Internal,
    Unexpected,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            404 => Self::NotFound,
            422 => Self::Validation,
            500..=599 => Self::Internal,
            _ => Self::Unexpected,
        }
    }
}

/// Error body returned by the exam service: `{"detail": ...}`.
///
/// Validation failures put a list of field errors in `detail` instead of a
/// string, so it is kept as raw JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ApiErrorBody {
    pub fn message(&self) -> String {
        match &self.detail {
            Some(serde_json::Value::String(text)) if !text.trim().is_empty() => text.clone(),
            Some(serde_json::Value::Null) | None => DEFAULT_ERROR_DETAIL.to_string(),
            Some(other) => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("{code:?} ({status}): {message}")]
pub struct ApiException {
    pub code: ErrorCode,
    pub status: u16,
    pub message: String,
}

impl ApiException {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::from_status(status),
            status,
            message: message.into(),
        }
    }

    /// Builds the exception from a raw error body, tolerating non-JSON bodies.
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ApiErrorBody>(body)
            .map(|parsed| parsed.message())
            .unwrap_or_else(|_| DEFAULT_ERROR_DETAIL.to_string());
        Self::new(status, message)
    }
}
