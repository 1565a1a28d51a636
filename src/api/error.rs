//! Errors surfaced by server calls.
//!
//! Every failure a mutation can hit maps to one variant here; the feed
//! store treats them all alike (roll back, hand the error to the caller),
//! while the presentation layer uses the variant to pick a message.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed (connection refused, reset, DNS).
    #[error("Request to '{procedure}' failed: {message}")]
    Transport { procedure: String, message: String },

    #[error("Request to '{procedure}' timed out after {duration_ms}ms")]
    Timeout { procedure: String, duration_ms: u64 },

    /// The caller is not signed in or may not perform the mutation.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    /// The server refused the input.
    #[error("Rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Invalid response from '{procedure}': {source}")]
    Decode {
        procedure: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid API URL '{url}'")]
    InvalidUrl { url: String },
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ApiError {
    /// Classify a non-success response.
    ///
    /// Understands `{"error": {"code": .., "message": ..}}` bodies and falls
    /// back to the raw body text.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(ErrorEnvelope { error }) => error
                .message
                .or(error.code)
                .unwrap_or_else(|| format!("HTTP {}", status)),
            Err(_) if body.trim().is_empty() => format!("HTTP {}", status),
            Err(_) => body.trim().to_string(),
        };

        match status {
            401 | 403 => ApiError::Unauthorized { message },
            404 => ApiError::NotFound { message },
            400..=499 => ApiError::Rejected { status, message },
            _ => ApiError::Server { status, message },
        }
    }

    /// Whether repeating the same request could succeed. Only idempotent
    /// queries are ever retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Transport { .. } | ApiError::Timeout { .. })
    }

    /// Short message for a toast or status line.
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::Transport { .. } | ApiError::Timeout { .. } => {
                "Couldn't reach the server. Check your connection."
            }
            ApiError::Unauthorized { .. } => "Please sign in to do that.",
            ApiError::NotFound { .. } => "That post no longer exists.",
            ApiError::Rejected { .. } => "The server rejected the request.",
            ApiError::Server { .. } | ApiError::Decode { .. } | ApiError::InvalidUrl { .. } => {
                "Something went wrong. Please try again."
            }
        }
    }
}
