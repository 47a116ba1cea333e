//! Error types for the finance tracker client.
//!
//! Every failure the store can observe ends up as an [`ApiError`]. Its
//! `Display` output is what gets recorded in the store's `error` field, so the
//! `Server` variant prints the backend message verbatim.

use reqwest::StatusCode;
use thiserror::Error;

/// Coarse category of a failed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Server,
    Decode,
    Url,
}

#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced an HTTP response
    #[error("{0}")]
    Network(String),

    /// The backend answered with a non-success status
    #[error("{message}")]
    Server { status: StatusCode, message: String },

    /// The response body was not the JSON we expected
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// A request URL could not be built from the base URL
    #[error("Invalid request URL: {0}")]
    Url(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network(_) => ErrorKind::Network,
            ApiError::Server { .. } => ErrorKind::Server,
            ApiError::Decode(_) => ErrorKind::Decode,
            ApiError::Url(_) => ErrorKind::Url,
        }
    }

    /// Build a server error, falling back to a generic message when the
    /// backend did not supply one.
    pub fn server(status: StatusCode, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback_message(status));
        ApiError::Server { status, message }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Generic message used when an error response carries no `message` field
pub fn fallback_message(status: StatusCode) -> String {
    format!("Request failed with status code {}", status.as_u16())
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
