//! API error types using thiserror.

/// Errors raised by the crash-stats API client.
///
/// A missing expected field and a remote error payload both mean the day
/// being processed cannot be aggregated; callers skip the day and continue
/// with the rest of the run.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// Transport-level failure or non-success status.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL or a derived endpoint URL is invalid.
    #[error("invalid API URL: {0}")]
    Url(#[from] url::ParseError),

    /// The response decoded, but an expected field is absent.
    #[error("{endpoint} response is missing `{field}`")]
    MissingField {
        /// Endpoint that produced the response.
        endpoint: &'static str,
        /// Dotted path of the absent field.
        field: &'static str,
    },

    /// The API answered with an error payload instead of data.
    #[error("{endpoint} returned an error: {message}")]
    Remote {
        /// Endpoint that produced the response.
        endpoint: &'static str,
        /// Error message reported by the server.
        message: String,
    },
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
