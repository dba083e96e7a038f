use thiserror::Error;

/// Errors raised while driving the OAuth login flow.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No authorization code available; run the authorization flow first")]
    MissingAuthCode,
    #[error("No access token available")]
    MissingAccessToken,
    #[error("Timed out after {waited_secs}s waiting for the authorization code")]
    Timeout { waited_secs: u64 },
    #[error("Provider error (status {status}): {body}")]
    Provider { status: u16, body: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<std::io::Error> for AuthError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}
