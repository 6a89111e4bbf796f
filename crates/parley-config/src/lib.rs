//! Parley configuration system.
//!
//! Loads the session persona, sampling parameters, and backend tuning
//! from a JSON (or TOML) document. Optional fields use defaults so a
//! three-field document is enough to start a session.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use parley_config::load_from_path;
//!
//! let config = load_from_path("assistant.json".as_ref()).expect("failed to load config");
//! println!("{:?}", config.stop_sequences());
//! ```

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{default_config_path, load_default, load_from_path, parse_document, DocumentFormat};
pub use schema::{
    BackendKind, BackendSettings, ConfigDocument, LocalEngineSettings, RemoteSettings,
    RetrySettings, SeedMessage, SessionConfig,
};

use std::path::Path;

use parley_common::ConfigError;

/// Load from an explicit path when given, else from the platform default.
pub fn load_config(path: Option<&Path>) -> Result<SessionConfig, ConfigError> {
    match path {
        Some(p) => load_from_path(p),
        None => load_default(),
    }
}
