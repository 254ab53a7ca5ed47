//! Error types for dbd-core

use thiserror::Error;

/// Core error type for dbdeploy
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Failed to parse configuration file
    #[error("[C002] Failed to parse config: {0}")]
    ConfigParseError(#[from] serde_yaml::Error),

    /// C003: Invalid configuration value
    #[error("[C003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C004: Unknown target requested
    #[error("[C004] Unknown target '{name}'. Available targets: {available}")]
    UnknownTarget { name: String, available: String },

    /// C005: Scripts directory not found
    #[error("[C005] Scripts directory not found: {path}")]
    ScriptsDirNotFound { path: String },

    /// C006: Script file name does not start with a script number
    #[error("[C006] Unrecognised change script file name '{file}': expected a leading script number, e.g. '001_create_users.sql'")]
    UnrecognisedFilename { file: String },

    /// C007: Invalid changelog table name
    #[error("[C007] Invalid changelog table name '{name}': {reason}")]
    InvalidTableName { name: String, reason: String },

    /// C008: IO error with file path context
    #[error("[C008] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
