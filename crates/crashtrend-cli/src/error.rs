//! Application-wide error types using thiserror.

use crashtrend_api::ApiError;
use crashtrend_common::CrashTrendError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Configuration, storage, or data-integrity error.
    #[error(transparent)]
    Common(#[from] CrashTrendError),

    /// Crash-stats API error.
    #[error("Crash-stats API error: {0}")]
    Api(#[from] ApiError),
}

/// Result type for the application.
pub type AppResult<T> = Result<T, AppError>;
