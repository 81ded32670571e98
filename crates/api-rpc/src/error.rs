//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use balanceq_core::error::AppError;
use jsonrpsee::types::ErrorObjectOwned;

/// RPC Error Codes
pub mod code {
    pub const MALFORMED_ITEM: i32 = 4000;
    pub const INVALID_ARGUMENT: i32 = 4001;
    pub const INVALID_STATE: i32 = 4002;
    pub const NO_ACTIVE_QUEUES: i32 = 4004;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const STORAGE_UNAVAILABLE: i32 = 5001;
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    let message = err.to_string();
    match err {
        AppError::NoActiveQueues => {
            ErrorObjectOwned::owned(code::NO_ACTIVE_QUEUES, message, None::<()>)
        }
        AppError::MalformedItem(_) => {
            ErrorObjectOwned::owned(code::MALFORMED_ITEM, message, None::<()>)
        }
        AppError::StorageUnavailable(_) => {
            ErrorObjectOwned::owned(code::STORAGE_UNAVAILABLE, message, None::<()>)
        }
        AppError::InvalidArgument(_) => {
            ErrorObjectOwned::owned(code::INVALID_ARGUMENT, message, None::<()>)
        }
        AppError::InvalidState(_) => {
            ErrorObjectOwned::owned(code::INVALID_STATE, message, None::<()>)
        }
        AppError::Config(_) | AppError::Internal(_) => {
            ErrorObjectOwned::owned(code::INTERNAL_ERROR, message, None::<()>)
        }
    }
}
