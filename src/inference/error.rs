use std::time::Duration;
use thiserror::Error;

/// Why a single inference source produced no usable reading.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    #[error("cannot connect to {url}")]
    Unreachable { url: String },

    #[error("HTTP error from {url}: {status}")]
    Status { url: String, status: u16 },

    #[error("source reported failure: {0}")]
    Reported(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl SourceError {
    /// Only connection failures are worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, SourceError::Unreachable { .. })
    }
}
