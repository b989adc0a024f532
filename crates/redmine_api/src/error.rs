//! Error model used by Redmine API client operations.

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RedmineError>;

/// Represents the error conditions that can occur while talking to a Redmine server, including HTTP errors with status and message, authentication failures, timeouts, network issues, serialization problems and other unexpected errors.
#[derive(Debug, Error)]
pub enum RedmineError {
    #[error("http {status}: {message}")]
    Http {
        status: StatusCode,
        message: String,
    },
    #[error("authentication error: {0}")]
    Authentication(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("unexpected error: {0}")]
    Other(String),
}

impl RedmineError {
    /// Constructs an HTTP error variant from a response status and body detail.
    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        RedmineError::Http {
            status,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for RedmineError {
    /// Converts reqwest errors into semantic RedmineError variants.
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RedmineError::Timeout(err.to_string())
        } else if err.is_status() {
            let status = err.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            RedmineError::Http {
                status,
                message: err.to_string(),
            }
        } else if err.is_connect() {
            RedmineError::Network(err.to_string())
        } else {
            RedmineError::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RedmineError {
    /// Converts serde_json decode/encode failures into serialization errors.
    fn from(err: serde_json::Error) -> Self {
        RedmineError::Serialization(err.to_string())
    }
}
