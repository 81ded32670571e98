//! SDK Error Types

use thiserror::Error;

/// JSON-RPC error codes returned by the daemon
pub mod code {
    pub const MALFORMED_ITEM: i32 = 4000;
    pub const INVALID_ARGUMENT: i32 = 4001;
    pub const INVALID_STATE: i32 = 4002;
    pub const NO_ACTIVE_QUEUES: i32 = 4004;
    pub const STORAGE_UNAVAILABLE: i32 = 5001;
}

/// SDK Result type
pub type Result<T> = std::result::Result<T, SdkError>;

/// SDK Error
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("No active queues available: {0}")]
    NoActiveQueues(String),

    #[error("Malformed item: {0}")]
    MalformedItem(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid server state: {0}")]
    InvalidState(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("RPC error ({code}): {message}")]
    Rpc { code: i32, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl SdkError {
    /// Failures worth retrying after a pause
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SdkError::NoActiveQueues(_)
                | SdkError::StorageUnavailable(_)
                | SdkError::Transport(_)
                | SdkError::Connection(_)
        )
    }

    fn from_call(code: i32, message: String) -> Self {
        match code {
            code::NO_ACTIVE_QUEUES => SdkError::NoActiveQueues(message),
            code::MALFORMED_ITEM => SdkError::MalformedItem(message),
            code::INVALID_ARGUMENT => SdkError::InvalidArgument(message),
            code::INVALID_STATE => SdkError::InvalidState(message),
            code::STORAGE_UNAVAILABLE => SdkError::StorageUnavailable(message),
            _ => SdkError::Rpc { code, message },
        }
    }
}

impl From<jsonrpsee::core::ClientError> for SdkError {
    fn from(e: jsonrpsee::core::ClientError) -> Self {
        match e {
            jsonrpsee::core::ClientError::Call(call_err) => {
                SdkError::from_call(call_err.code(), call_err.message().to_string())
            }
            jsonrpsee::core::ClientError::Transport(e) => {
                SdkError::Transport(format!("Transport error: {}", e))
            }
            jsonrpsee::core::ClientError::RestartNeeded(_) => {
                SdkError::Connection("Connection restart needed".to_string())
            }
            jsonrpsee::core::ClientError::ParseError(e) => {
                SdkError::Other(format!("Parse error: {}", e))
            }
            _ => SdkError::Other(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_map_to_variants() {
        assert!(matches!(
            SdkError::from_call(4004, "none".into()),
            SdkError::NoActiveQueues(_)
        ));
        assert!(matches!(
            SdkError::from_call(4000, "bad".into()),
            SdkError::MalformedItem(_)
        ));
        assert!(matches!(
            SdkError::from_call(4001, "out of range".into()),
            SdkError::InvalidArgument(_)
        ));
        assert!(matches!(
            SdkError::from_call(4002, "bad".into()),
            SdkError::InvalidState(_)
        ));
        assert!(matches!(
            SdkError::from_call(5001, "down".into()),
            SdkError::StorageUnavailable(_)
        ));
        assert!(matches!(
            SdkError::from_call(-32602, "invalid params".into()),
            SdkError::Rpc { code: -32602, .. }
        ));
    }

    #[test]
    fn test_transient_classification() {
        assert!(SdkError::NoActiveQueues(String::new()).is_transient());
        assert!(!SdkError::MalformedItem(String::new()).is_transient());
    }
}
