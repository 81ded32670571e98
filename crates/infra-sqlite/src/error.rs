// sqlx::Error -> AppError mapping
//
// Every backend failure surfaces as StorageUnavailable; callers never retry.

use balanceq_core::error::AppError;

/// Convert sqlx::Error to AppError with the SQLite result code when present
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => match db_err.code() {
            // SQLite result codes: https://www.sqlite.org/rescode.html
            Some(code) => match code.as_ref() {
                "5" => AppError::StorageUnavailable(format!(
                    "Database locked (SQLITE_BUSY): {}",
                    db_err.message()
                )),
                "6" => AppError::StorageUnavailable(format!(
                    "Table locked (SQLITE_LOCKED): {}",
                    db_err.message()
                )),
                "13" => {
                    AppError::StorageUnavailable(format!("Database full: {}", db_err.message()))
                }
                code_str => AppError::StorageUnavailable(format!(
                    "Database error [{}]: {}",
                    code_str,
                    db_err.message()
                )),
            },
            None => AppError::StorageUnavailable(format!("Database error: {}", db_err.message())),
        },
        sqlx::Error::PoolTimedOut => {
            AppError::StorageUnavailable("Timed out waiting for a database connection".to_string())
        }
        sqlx::Error::PoolClosed => {
            AppError::StorageUnavailable("Database pool is closed".to_string())
        }
        sqlx::Error::ColumnNotFound(col) => {
            AppError::StorageUnavailable(format!("Column not found: {}", col))
        }
        // Connection, protocol and decode errors
        _ => AppError::StorageUnavailable(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_are_storage_unavailable() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolClosed),
            AppError::StorageUnavailable(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::RowNotFound),
            AppError::StorageUnavailable(_)
        ));
    }
}
