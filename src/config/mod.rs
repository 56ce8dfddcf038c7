//! Configuration management.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `BOOK_FINDER_*` environment variables (nested keys separated by `__`, e.g.
//! `BOOK_FINDER_CATALOG__PAGE_SIZE=100`).

mod file_config;

pub use file_config::{save_config, ConfigFileError, CONFIG_FILE_NAME};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::OPEN_LIBRARY_BASE_URL;
use crate::models::DEFAULT_PAGE_SIZE;
use crate::search::{DEFAULT_QUIET_PERIOD, DEFAULT_SCROLL_THRESHOLD};
use crate::utils::{COVERS_BASE_URL, DEFAULT_TIMEOUT};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "BOOK_FINDER";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Catalog endpoints and paging
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Interactive search behaviour
    #[serde(default)]
    pub search: SearchConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Catalog endpoints and paging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// API root for search and work lookups
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Cover image service root
    #[serde(default = "default_covers_url")]
    pub covers_url: String,

    /// Results per page, sent as `limit` and used for the has-more check
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            covers_url: default_covers_url(),
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl CatalogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Page size, never zero
    pub fn page_size(&self) -> usize {
        self.page_size.max(1)
    }
}

fn default_base_url() -> String {
    OPEN_LIBRARY_BASE_URL.to_string()
}

fn default_covers_url() -> String {
    COVERS_BASE_URL.to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

/// Interactive search behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period before a typed query is searched
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Rows from the bottom at which scrolling loads the next page
    #[serde(default = "default_scroll_threshold")]
    pub scroll_threshold: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            scroll_threshold: default_scroll_threshold(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn default_debounce_ms() -> u64 {
    DEFAULT_QUIET_PERIOD.as_millis() as u64
}

fn default_scroll_threshold() -> u32 {
    DEFAULT_SCROLL_THRESHOLD
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when neither `RUST_LOG` nor `-v` is given
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(environment())
        .build()?;

    settings.try_deserialize()
}

/// Configuration from defaults and environment only
pub fn get_config() -> Result<Config, config::ConfigError> {
    config::Config::builder()
        .add_source(environment())
        .build()?
        .try_deserialize()
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Find a configuration file in the default locations.
///
/// Checks `./book-finder.toml`, then `<config dir>/book-finder/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("book-finder").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Default location used by `init-config`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("book-finder").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}
