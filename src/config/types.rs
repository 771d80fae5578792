//! Core configuration types and loading.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Client configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Transport and session settings.
    pub connection: ConnectionConfig,
    /// Event bus settings.
    pub events: EventsConfig,
    /// Per-plugin option tables, keyed by plugin name.
    pub plugins: HashMap<String, toml::Table>,
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Run the sanity checks applied by `ClientBuilder::build`.
    pub fn validate(&self) -> Result<(), Vec<super::ValidationError>> {
        super::validate(self)
    }

    /// Deserialize the option table of one plugin.
    ///
    /// Returns `Ok(None)` when the config has no `[plugins.<name>]` section.
    pub fn plugin_options<T: DeserializeOwned>(
        &self,
        name: &str,
    ) -> Result<Option<T>, ConfigError> {
        match self.plugins.get(name) {
            Some(table) => Ok(Some(toml::Value::Table(table.clone()).try_into()?)),
            None => Ok(None),
        }
    }
}

/// Transport and session settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Port used when `connect` is not given one.
    #[serde(default = "default_port")]
    pub default_port: u16,
    /// Bytes requested per transport read.
    #[serde(default = "default_read_buffer_size")]
    pub read_buffer_size: usize,
    /// Character encoding label for the wire (e.g. "utf-8", "latin1").
    #[serde(default = "default_encoding")]
    pub encoding: String,
    /// Timeout for opening a stream, in seconds (0 disables it).
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl ConnectionConfig {
    /// Connect timeout as a duration, `None` when disabled.
    pub fn connect_timeout(&self) -> Option<Duration> {
        (self.connect_timeout_secs > 0).then(|| Duration::from_secs(self.connect_timeout_secs))
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            default_port: default_port(),
            read_buffer_size: default_read_buffer_size(),
            encoding: default_encoding(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Event bus settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Ceiling on listeners per event name.
    #[serde(default = "default_max_listeners")]
    pub max_listeners: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            max_listeners: default_max_listeners(),
        }
    }
}
