//! Places error types

use thiserror::Error;

/// Errors that can occur while querying the places service
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Connection to the places service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The service answered with a non-success status
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// API key missing, invalid or not allowed to call the endpoint
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Failed to parse response from the places service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Rate limit or quota exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by API)
        retry_after_secs: Option<u64>,
    },

    /// Service is temporarily unavailable (5xx)
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Query is unusable (e.g. empty name)
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl PlacesError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::ServiceUnavailable(_)
                | Self::Timeout { .. }
                | Self::RateLimitExceeded { .. }
        )
    }

    /// Returns true if the failure only means "no usable answer for this query"
    ///
    /// Timeouts and every non-success status, 401/403 included, are
    /// reported to callers as a miss rather than an error.
    #[must_use]
    pub const fn is_miss(&self) -> bool {
        matches!(
            self,
            Self::RequestFailed(_)
                | Self::Unauthorized(_)
                | Self::ServiceUnavailable(_)
                | Self::Timeout { .. }
                | Self::RateLimitExceeded { .. }
                | Self::ParseError(_)
        )
    }
}
