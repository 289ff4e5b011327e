mod validation;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const HOST_KEY: &str = "host";
pub const PORT_KEY: &str = "port";
pub const CHUNK_SIZE_KEY: &str = "chunksize";
pub const TIMEOUT_KEY: &str = "timeout";

pub const DEFAULT_CHUNK_SIZE: usize = 25;
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(&'static str),
    #[error("setting {name} must be {expected}, got {found}")]
    WrongType {
        name: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// A single typed setting as supplied by the plugin host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ConfigValue {
    fn kind(&self) -> &'static str {
        match self {
            ConfigValue::Bool(_) => "bool",
            ConfigValue::Int(_) => "integer",
            ConfigValue::Float(_) => "float",
            ConfigValue::Str(_) => "string",
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Str(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Str(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Int(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        ConfigValue::Int(i64::from(value))
    }
}

/// Unresolved configuration handed over by the plugin host on every publish.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginConfig(HashMap<String, ConfigValue>);

impl PluginConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.get(key)
    }

    pub fn get_string(&self, key: &'static str) -> Result<&str, ConfigError> {
        match self.get(key) {
            Some(ConfigValue::Str(value)) => Ok(value),
            Some(other) => Err(ConfigError::WrongType {
                name: key,
                expected: "a string",
                found: other.kind(),
            }),
            None => Err(ConfigError::Missing(key)),
        }
    }

    pub fn get_int(&self, key: &'static str) -> Result<i64, ConfigError> {
        match self.get(key) {
            Some(ConfigValue::Int(value)) => Ok(*value),
            Some(other) => Err(ConfigError::WrongType {
                name: key,
                expected: "an integer",
                found: other.kind(),
            }),
            None => Err(ConfigError::Missing(key)),
        }
    }

    fn get_int_or(&self, key: &'static str, default: i64) -> Result<i64, ConfigError> {
        match self.get_int(key) {
            Err(ConfigError::Missing(_)) => Ok(default),
            other => other,
        }
    }
}

/// Resolved and validated publisher settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublisherConfig {
    pub host: String,
    pub port: u16,
    pub chunk_size: usize,
    pub timeout: Duration,
}

impl PublisherConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            chunk_size: DEFAULT_CHUNK_SIZE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_plugin_config(config: &PluginConfig) -> Result<Self, ConfigError> {
        let host = config.get_string(HOST_KEY)?.trim().to_string();
        let port = config.get_int(PORT_KEY)?;
        let chunk_size = config.get_int_or(CHUNK_SIZE_KEY, DEFAULT_CHUNK_SIZE as i64)?;
        let timeout = config.get_int_or(TIMEOUT_KEY, DEFAULT_TIMEOUT_SECS as i64)?;

        let port = u16::try_from(port).map_err(|_| ConfigError::Invalid {
            name: PORT_KEY,
            reason: format!("{port} is not a valid port"),
        })?;
        let chunk_size = usize::try_from(chunk_size).map_err(|_| ConfigError::Invalid {
            name: CHUNK_SIZE_KEY,
            reason: format!("{chunk_size} is negative"),
        })?;
        let timeout = u64::try_from(timeout).map_err(|_| ConfigError::Invalid {
            name: TIMEOUT_KEY,
            reason: format!("{timeout} is negative"),
        })?;

        let resolved = Self {
            host,
            port,
            chunk_size,
            timeout: Duration::from_secs(timeout),
        };
        resolved.validate()?;
        Ok(resolved)
    }

    /// Base URL of the OpenTSDB server. A host given without a scheme is
    /// assumed to speak plain HTTP.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let raw = if self.host.contains("://") {
            self.host.clone()
        } else {
            format!("http://{}", self.host)
        };

        let mut url = Url::parse(&raw)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid host '{}': {}", self.host, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "Unsupported scheme '{}' in host '{}'",
                url.scheme(),
                self.host
            )));
        }

        url.set_port(Some(self.port))
            .map_err(|()| ConfigError::InvalidUrl(format!("Cannot set port on '{}'", self.host)))?;
        Ok(url)
    }
}
