//! Configuration loading and management.
//!
//! Configuration is loaded with the following precedence:
//! 1. Environment variables (`CHATSHELF_*`)
//! 2. Config file (`~/.chatshelf/config.toml`)
//! 3. Defaults

use crate::client::DEFAULT_ENDPOINT;
use crate::error::{Error, Result};
use crate::storage::DEFAULT_SLOT_KEY;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,

    /// Chat endpoint configuration.
    pub endpoint: EndpointConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the chatshelf home directory.
    pub path: PathBuf,

    /// Key of the slot holding all conversations.
    pub slot_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_chatshelf_home(),
            slot_key: DEFAULT_SLOT_KEY.to_string(),
        }
    }
}

/// Chat endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// URL chat messages are posted to.
    pub url: String,

    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl EndpointConfig {
    /// Request timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENDPOINT.to_string(),
            timeout_seconds: 60,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

/// Get the default chatshelf home directory.
fn default_chatshelf_home() -> PathBuf {
    dirs::home_dir().map_or_else(|| PathBuf::from(".chatshelf"), |h| h.join(".chatshelf"))
}

/// Load configuration with precedence: env vars → file → defaults.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if
/// the resulting configuration is invalid.
pub fn load_config() -> Result<Config> {
    let mut config = Config::default();

    let config_path = get_config_path();
    if config_path.exists() {
        let contents = fs::read_to_string(&config_path).map_err(Error::Storage)?;
        config = parse_config(&contents)?;
    }

    apply_env_overrides(&mut config, |name| env::var(name).ok());
    validate(&config)?;

    Ok(config)
}

/// Parse a TOML configuration document.
///
/// # Errors
///
/// Returns an error if the document is not valid TOML for [`Config`].
pub fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).map_err(|e| Error::Config(e.to_string()))
}

/// Get the path to the config file.
fn get_config_path() -> PathBuf {
    if let Ok(path) = env::var("CHATSHELF_CONFIG") {
        return PathBuf::from(path);
    }

    if let Ok(home) = env::var("CHATSHELF_HOME") {
        return PathBuf::from(home).join("config.toml");
    }

    default_chatshelf_home().join("config.toml")
}

/// Apply environment variable overrides to config.
///
/// `lookup` resolves a variable name to its value.
fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(path) = lookup("CHATSHELF_STORAGE_PATH") {
        config.storage.path = PathBuf::from(path);
    } else if let Some(home) = lookup("CHATSHELF_HOME") {
        config.storage.path = PathBuf::from(home);
    }

    if let Some(key) = lookup("CHATSHELF_SLOT_KEY") {
        config.storage.slot_key = key;
    }

    if let Some(url) = lookup("CHATSHELF_ENDPOINT") {
        config.endpoint.url = url;
    }

    if let Some(secs) = lookup("CHATSHELF_TIMEOUT_SECONDS").and_then(|v| v.parse().ok()) {
        config.endpoint.timeout_seconds = secs;
    }

    if let Some(filter) = lookup("CHATSHELF_LOG") {
        config.logging.filter = filter;
    }
}

fn validate(config: &Config) -> Result<()> {
    if config.endpoint.url.trim().is_empty() {
        return Err(Error::Config("endpoint.url must not be empty".to_string()));
    }
    if config.endpoint.timeout_seconds == 0 {
        return Err(Error::Config(
            "endpoint.timeout_seconds must be greater than zero".to_string(),
        ));
    }
    if config.storage.slot_key.trim().is_empty() {
        return Err(Error::Config("storage.slot_key must not be empty".to_string()));
    }
    Ok(())
}
