//! Query executor trait definition

use crate::error::DbResult;

/// One result row; each cell rendered as text, `None` for SQL NULL.
pub type Row = Vec<Option<String>>;

/// Thin transport over a live connection.
///
/// Implementations run statements exactly as given and report driver errors
/// verbatim; they make no decisions about what an error means.
pub trait QueryExecutor: Send + Sync {
    /// Execute one statement, returning affected rows
    fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute a multi-statement batch
    fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Run a query and return all rows as text
    fn query(&self, sql: &str) -> DbResult<Vec<Row>>;

    /// Open a transaction scope
    fn begin(&self) -> DbResult<()>;

    /// Commit the open transaction scope
    fn commit(&self) -> DbResult<()>;

    /// Roll back the open transaction scope
    fn rollback(&self) -> DbResult<()>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
