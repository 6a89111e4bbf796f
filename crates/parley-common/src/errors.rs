use std::path::PathBuf;

/// Startup-time configuration failures. None of these are retried; a
/// session cannot be constructed until the document is fixed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    MissingFile(PathBuf),

    #[error("missing required config field: {0}")]
    MissingRequiredField(&'static str),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}
