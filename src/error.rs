use std::time::Duration;

use thiserror::Error;

/// Application-level failure carrying the process exit code.
///
/// Only configuration and output problems end up here. Upstream instability
/// never does: the quote pipeline degrades to demo data instead.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// A failed document retrieval.
///
/// Every variant is recoverable from the chain's point of view: the provider
/// that produced it is abandoned and the next one is tried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Upstream answered outside the 2xx range.
    #[error("upstream returned status {status}")]
    Status { status: u16 },

    /// The request did not complete within its time slice.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection, TLS or body-decoding failure.
    #[error("network error: {0}")]
    Network(String),

    /// A 2xx response with nothing in it.
    #[error("empty response body")]
    EmptyBody,
}

impl FetchError {
    /// Whether another attempt against the same URL could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Status { status } => *status == 429 || *status >= 500,
            FetchError::Timeout(_) | FetchError::Network(_) => true,
            FetchError::EmptyBody => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_classification() {
        assert!(FetchError::Status { status: 503 }.is_retryable());
        assert!(FetchError::Status { status: 429 }.is_retryable());
        assert!(!FetchError::Status { status: 404 }.is_retryable());
        assert!(!FetchError::EmptyBody.is_retryable());
        assert!(FetchError::Timeout(Duration::from_secs(1)).is_retryable());
    }
}
