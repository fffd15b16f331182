//! REST client error types.

use mercantil_common::FieldErrors;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("API returned {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Could not reach the API: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// HTTP status reported by the remote API, when it answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::NotFound(_) => Some(404),
            ClientError::Conflict(_) => Some(409),
            ClientError::Validation(_) => Some(400),
            ClientError::Remote { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            ClientError::Decode { .. } | ClientError::InvalidUrl(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }
}
