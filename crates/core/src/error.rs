// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Enqueue found no active queue to route to. Fatal for the call.
    #[error("No active queues available")]
    NoActiveQueues,

    /// Completion payload is not a JSON object
    #[error("Malformed item: {0}")]
    MalformedItem(String),

    /// Any failure reported by the storage adapter
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Caller-supplied value out of range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Stored data exists but cannot be interpreted
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// True for failures a caller may reasonably retry later
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::NoActiveQueues | AppError::StorageUnavailable(_))
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
