//! Error types for Exposure Dash.
//!
//! This module provides a unified error handling approach using `thiserror`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Exposure Dash operations.
pub type Result<T> = std::result::Result<T, DashError>;

/// Errors that can occur in Exposure Dash.
#[derive(Debug, Error)]
pub enum DashError {
    /// The request never produced an HTTP response (connection refused, timeout, ...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status and no usable message.
    #[error("Server returned HTTP {status}")]
    HttpStatus {
        /// The HTTP status code.
        status: u16,
    },

    /// The server reported an application-level error.
    #[error("{message}")]
    Api {
        /// HTTP status the error arrived with.
        status: u16,
        /// Server-provided message.
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("Malformed response: {0}")]
    MalformedBody(String),

    /// A serialized chart payload could not be parsed.
    #[error("Invalid chart payload: {0}")]
    InvalidChart(String),

    /// Invalid configuration (base URL, timeout, ...).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failed to open a file.
    #[error("Failed to open file: {path}")]
    FileOpen {
        /// Path that could not be opened.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to access clipboard.
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] arboard::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error outside of an HTTP exchange.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DashError {
    /// Create a FileOpen error.
    pub fn file_open(path: PathBuf, source: std::io::Error) -> Self {
        Self::FileOpen { path, source }
    }

    /// Create an Api error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a MalformedBody error.
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedBody(detail.into())
    }

    /// Whether this failure happened below the HTTP layer.
    ///
    /// Transport failures are logged but never surfaced as an alert.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Message suitable for a user-facing alert.
    pub fn alert_message(&self) -> String {
        match self {
            Self::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::Api { status, .. } | Self::HttpStatus { status } => {
                format!("Analysis failed (HTTP {})", status)
            },
            Self::MalformedBody(_) => "Analysis failed: unexpected response from server".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for DashError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::HttpStatus {
                status: status.as_u16(),
            },
            None if err.is_decode() => Self::MalformedBody(err.to_string()),
            None => Self::Transport(err.to_string()),
        }
    }
}
