//! Error types for dbd-engine

use dbd_db::DbError;
use thiserror::Error;

/// Deployment errors
///
/// Absence of the changelog table is never reported through this type: it
/// is absorbed by the version manager and surfaced as "nothing applied".
#[derive(Error, Debug)]
pub enum DeployError {
    /// Unknown dbms identifier (DD001)
    #[error("[DD001] {0}")]
    UnsupportedDialect(#[from] dbd_sql::SqlError),

    /// No live executor for the target (DD002)
    #[error("[DD002] Cannot connect to target: {0}")]
    Connection(#[source] DbError),

    /// Changelog query failed for a reason other than table absence (DD003)
    #[error("[DD003] Failed to read changelog table {table}: {message}")]
    ChangelogReadFailure { table: String, message: String },

    /// Changelog DDL failed (DD004)
    #[error("[DD004] Failed to create changelog table {table}: {source}")]
    ChangeLogTableCreationFailure {
        table: String,
        #[source]
        source: DbError,
    },

    /// A statement of a pending script failed (DD005)
    ///
    /// `statement_index` is 1-based.
    #[error(
        "[DD005] Change script {script} ({name}) failed at statement {statement_index}: {source}\n  statement: {statement}"
    )]
    ScriptApplicationFailure {
        script: String,
        name: String,
        statement_index: usize,
        statement: String,
        #[source]
        source: DbError,
    },

    /// Two discovered scripts share one identity (DD006)
    #[error("[DD006] Duplicate change script {key}: '{first}' and '{second}'")]
    DuplicateScriptNumber {
        key: String,
        first: String,
        second: String,
    },

    /// Script numbering has a hole and gaps are not allowed (DD007)
    #[error("[DD007] Gap in change scripts of folder '{folder}': no script between {previous} and {next}")]
    ScriptNumberGap {
        folder: String,
        previous: u64,
        next: u64,
    },

    /// Changelog insert failed (DD008)
    #[error("[DD008] Failed to record change script {script} in the changelog: {source}")]
    ChangelogWriteFailure {
        script: String,
        #[source]
        source: DbError,
    },

    /// BEGIN, COMMIT or ROLLBACK failed (DD009)
    #[error("[DD009] Transaction {operation} failed for change script {script}: {source}")]
    TransactionFailure {
        script: String,
        operation: &'static str,
        #[source]
        source: DbError,
    },

    /// Template rendering failed (DD010)
    #[error("[DD010] {0}")]
    Render(#[from] dbd_template::TemplateError),

    /// Writing rendered output failed (DD011)
    #[error("[DD011] Failed to write rendered script: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for DeployError
pub type DeployResult<T> = Result<T, DeployError>;
