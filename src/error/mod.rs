//! Error types for instagraph.

use thiserror::Error;

use crate::auth::AuthError;

/// Primary error type for all Graph API operations.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Graph API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Page {0} has no connected Instagram business account")]
    NoLinkedAccount(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Timed out after {0}s")]
    Timeout(u64),
}

impl From<AuthError> for GraphError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::Provider { status, body } => GraphError::Api { status, body },
            AuthError::Timeout { waited_secs } => GraphError::Timeout(waited_secs),
            other => GraphError::Authentication(other.to_string()),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, GraphError>;
