use crate::config::{
    CHUNK_SIZE_KEY, ConfigError, HOST_KEY, PORT_KEY, PluginConfig, TIMEOUT_KEY,
};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Publish newline-delimited JSON metric records to OpenTSDB.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML file with plugin settings (host, port, chunksize, timeout)
    #[arg(short, long, env = "OPENTSDB_CONFIG")]
    pub config: Option<PathBuf>,

    /// OpenTSDB host, optionally with scheme (overrides the config file)
    #[arg(long, env = "OPENTSDB_HOST")]
    pub host: Option<String>,

    /// OpenTSDB port (overrides the config file)
    #[arg(long, env = "OPENTSDB_PORT")]
    pub port: Option<i64>,

    /// Maximum number of points per put request
    #[arg(long, env = "OPENTSDB_CHUNK_SIZE")]
    pub chunk_size: Option<i64>,

    /// Request timeout in seconds
    #[arg(long, env = "OPENTSDB_TIMEOUT")]
    pub timeout: Option<i64>,

    /// NDJSON file of metric records, `-` reads stdin
    #[arg(short, long, default_value = "-")]
    pub input: String,

    /// Host tag for records without `plugin_running_on` (defaults to this machine's hostname)
    #[arg(long, env = "OPENTSDB_FALLBACK_HOST")]
    pub fallback_host: Option<String>,

    /// Do not tag records lacking `plugin_running_on` with a fallback host
    #[arg(long, conflicts_with = "fallback_host")]
    pub no_fallback_host: bool,

    #[arg(long, value_enum, default_value = "info", env = "LOG_LEVEL")]
    pub log_level: LogLevel,

    #[arg(long, value_enum, default_value = "text", env = "LOG_FORMAT")]
    pub log_format: LogFormat,
}

impl Cli {
    /// Merges the config file (if any) with command line overrides.
    pub fn plugin_config(&self) -> Result<PluginConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => PluginConfig::from_file(path)?,
            None => PluginConfig::new(),
        };

        if let Some(host) = &self.host {
            config.set(HOST_KEY, host.as_str());
        }
        if let Some(port) = self.port {
            config.set(PORT_KEY, port);
        }
        if let Some(chunk_size) = self.chunk_size {
            config.set(CHUNK_SIZE_KEY, chunk_size);
        }
        if let Some(timeout) = self.timeout {
            config.set(TIMEOUT_KEY, timeout);
        }

        Ok(config)
    }

    pub fn fallback_host(&self) -> Option<String> {
        if self.no_fallback_host {
            return None;
        }
        self.fallback_host.clone().or_else(|| {
            hostname::get()
                .ok()
                .and_then(|name| name.into_string().ok())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigValue, PublisherConfig};
    use std::io::Write;

    #[test]
    fn overrides_take_precedence_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "host = \"http://from-file\"\nport = 4242\nchunksize = 50").unwrap();

        let cli = Cli::parse_from([
            "opentsdb-publish",
            "--config",
            file.path().to_str().unwrap(),
            "--port",
            "14242",
        ]);
        let config = cli.plugin_config().unwrap();

        assert_eq!(config.get(PORT_KEY), Some(&ConfigValue::Int(14242)));
        let resolved = PublisherConfig::from_plugin_config(&config).unwrap();
        assert_eq!(resolved.host, "http://from-file");
        assert_eq!(resolved.chunk_size, 50);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = Cli::parse_from(["opentsdb-publish", "--config", "/nonexistent/opentsdb.toml"]);
        assert!(matches!(cli.plugin_config(), Err(ConfigError::FileError(_))));
    }

    #[test]
    fn fallback_host_flags() {
        let cli = Cli::parse_from(["opentsdb-publish", "--fallback-host", "edge-1"]);
        assert_eq!(cli.fallback_host().as_deref(), Some("edge-1"));

        let cli = Cli::parse_from(["opentsdb-publish", "--no-fallback-host"]);
        assert_eq!(cli.fallback_host(), None);
    }

    #[test]
    fn log_level_maps_to_tracing() {
        assert_eq!(tracing::Level::from(LogLevel::Warn), tracing::Level::WARN);
        assert_eq!(LogLevel::Debug.as_str(), "debug");
    }
}
