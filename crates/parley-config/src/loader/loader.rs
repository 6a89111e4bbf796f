//! Core config loading: read from a path or the platform default.

use std::path::Path;

use parley_common::ConfigError;
use tracing::info;

use super::paths::default_config_path;
use crate::schema::{ConfigDocument, SessionConfig};

/// Serialization format of a config document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// `.toml` files are TOML; everything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

/// Parse and validate a config document held in memory.
pub fn parse_document(content: &str, format: DocumentFormat) -> Result<SessionConfig, ConfigError> {
    let doc: ConfigDocument = match format {
        DocumentFormat::Json => serde_json::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("failed to parse JSON: {e}")))?,
        DocumentFormat::Toml => toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?,
    };
    SessionConfig::from_document(doc)
}

/// Load config from a specific file path.
///
/// The file is read exactly once. Optional fields fall back to their
/// defaults; missing required fields fail with `MissingRequiredField`.
pub fn load_from_path(path: &Path) -> Result<SessionConfig, ConfigError> {
    let content =
        std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile(path.to_path_buf()))?;

    let config = parse_document(&content, DocumentFormat::from_path(path))?;

    info!(
        path = %path.display(),
        assistant = %config.assistant_name,
        backend = ?config.backend.kind,
        "loaded session config"
    );
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On Linux: `~/.config/parley/config.json`
/// On macOS: `~/Library/Application Support/parley/config.json`
pub fn load_default() -> Result<SessionConfig, ConfigError> {
    let path = default_config_path()?;
    load_from_path(&path)
}
