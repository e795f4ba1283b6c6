use serde::{Deserialize, Serialize};
use thiserror::Error;

/// All errors generated in `coinlore-data`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Deserialize, Serialize, Error)]
pub enum FetchError {
    #[error("invalid endpoint url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("HTTP request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("HTTP error from {url}: {status}")]
    Status { url: String, status: u16 },

    #[error("failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl FetchError {
    /// Determine if retrying the same request later could plausibly succeed.
    ///
    /// Network failures, rate limiting (429) and server side (5xx) statuses are transient.
    /// Malformed configuration, client errors and undecodable bodies are not.
    #[allow(clippy::match_like_matches_macro)]
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Transport { .. } => true,
            FetchError::Status { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }
}
