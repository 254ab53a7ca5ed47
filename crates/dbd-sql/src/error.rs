//! Error types for dbd-sql

use thiserror::Error;

/// SQL dialect errors
#[derive(Error, Debug)]
pub enum SqlError {
    /// Unknown DBMS identifier (S001)
    #[error("[S001] Unsupported dbms '{dbms}'. Supported: {supported}")]
    UnsupportedDialect { dbms: String, supported: String },
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;
