//! Error types for dbd-template

use thiserror::Error;

/// Template rendering errors
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Template render error (T001)
    #[error("[T001] Template render error: {0}")]
    RenderError(String),

    /// No template for the dialect (T002)
    #[error("[T002] No apply template '{name}' (built-in or in the template directory)")]
    TemplateNotFound { name: String },
}

/// Result type alias for TemplateError
pub type TemplateResult<T> = Result<T, TemplateError>;

impl From<minijinja::Error> for TemplateError {
    fn from(err: minijinja::Error) -> Self {
        TemplateError::RenderError(err.to_string())
    }
}
