//! Error types for the evalq client

use evalq_core::domain::job::JobId;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the evalq client
#[derive(Debug, Error)]
pub enum ClientError {
    /// The expression was empty after trimming; nothing was sent
    #[error("expression is empty")]
    EmptyExpression,

    /// The gateway declined the submission
    #[error("submission rejected: {0}")]
    SubmissionRejected(String),

    /// A single status poll failed; safe to retry on the next tick
    #[error("failed to fetch job {id} (status {status})")]
    FetchFailed { id: JobId, status: u16 },

    /// Transport-level failure on the wire
    #[error("network error: {0}")]
    Network(String),

    /// Credential refresh failed; the whole session is gone
    #[error("session expired")]
    SessionExpired,

    /// Failed to parse a response body
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// API returned an unexpected status code
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Parse(err.to_string())
    }
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Whether a poll tick may swallow this error and keep its timer running
    ///
    /// Transient failures skip the current tick; only a dead session is
    /// terminal for a poller.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::FetchFailed { .. } | Self::Network(_) | Self::Parse(_) | Self::Api { .. }
        )
    }
}
