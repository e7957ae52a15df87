//! Error types for the service client.

use aero_results::ResultsError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid server URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("HTTP client setup failed: {0}")]
    ClientSetup(#[source] reqwest::Error),

    #[error("Request to /{endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        source: reqwest::Error,
    },

    #[error("/{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    #[error("Unusable /simulate response: {0}")]
    InvalidResponse(#[from] ResultsError),
}

impl ServiceError {
    /// True when the service answered but the payload could not be used.
    pub fn is_invalid_response(&self) -> bool {
        matches!(self, ServiceError::InvalidResponse(_))
    }
}

/// Result type for service calls.
pub type ServiceResult<T> = Result<T, ServiceError>;
