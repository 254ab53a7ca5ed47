//! Error types for dbd-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Transaction control error (D003)
    #[error("[D003] Transaction {operation} failed: {message}")]
    TransactionError { operation: String, message: String },

    /// Not implemented (D004)
    #[error("[D004] No embedded driver for {backend}: {feature}")]
    NotImplemented { backend: String, feature: String },

    /// Mutex poisoned (D005)
    #[error("[D005] Database mutex poisoned: {0}")]
    MutexPoisoned(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        // "Table missing" is decided upstream from the dialect's pattern
        // list, so the raw driver text is preserved verbatim.
        DbError::ExecutionError(err.to_string())
    }
}

impl DbError {
    /// Driver message without the code prefix, for pattern matching
    pub fn message(&self) -> String {
        match self {
            DbError::ConnectionError(m)
            | DbError::ExecutionError(m)
            | DbError::MutexPoisoned(m) => m.clone(),
            DbError::TransactionError { message, .. } => message.clone(),
            DbError::NotImplemented { backend, feature } => format!("{backend}: {feature}"),
        }
    }
}
