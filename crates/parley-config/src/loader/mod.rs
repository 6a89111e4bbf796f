//! Config file loading (JSON or TOML) and default path resolution.

mod loader;
mod paths;


pub use loader::{load_default, load_from_path, parse_document, DocumentFormat};
pub use paths::default_config_path;
