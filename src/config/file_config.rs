//! Configuration file support for book-finder.
//!
//! # Configuration File Format
//!
//! ```toml
//! [catalog]
//! base_url = "https://openlibrary.org"
//! covers_url = "https://covers.openlibrary.org/b/id"
//! page_size = 20
//! timeout_secs = 30
//!
//! [search]
//! debounce_ms = 500
//! scroll_threshold = 50
//!
//! [logging]
//! level = "warn"
//! ```

use std::path::Path;

use super::Config;

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "book-finder.toml";

/// Write `config` as TOML, creating parent directories as needed
pub fn save_config(config: &Config, path: &Path) -> Result<(), ConfigFileError> {
    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
    }

    std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("Config file already exists: {0}")]
    AlreadyExists(String),
}
