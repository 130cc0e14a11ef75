//! TOML configuration for the server, the ticker and data loading.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::i18n::Language;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("invalid TOML in config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    ValidationError(String),
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,

    /// Largest accepted CSV upload, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

fn default_max_upload_bytes() -> usize {
    2 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Simulated V-sport ticker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerConfig {
    /// Seed for simulated scores
    #[serde(default = "default_seed")]
    pub seed: u64,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_seed() -> u64 {
    2024
}

fn default_true() -> bool {
    true
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            enabled: default_true(),
        }
    }
}

/// Top-level configuration, every field optional in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// CSV file loaded at startup
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Default label language
    #[serde(default)]
    pub language: Language,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub ticker: TickerConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            log_level: default_log_level(),
            language: Language::default(),
            server: ServerConfig::default(),
            ticker: TickerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(&std::fs::read_to_string(path)?)?;
        config.validate().map(|()| config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be non-zero".to_string(),
            ));
        }

        if self.server.max_upload_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "server.max_upload_bytes must be non-zero".to_string(),
            ));
        }

        if let Some(path) = &self.data_file {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError("data_file must not be empty".to_string()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.data_file, None);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.language, Language::Hu);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind_addr(), "127.0.0.1:8080");
        assert!(config.ticker.enabled);
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_port_rejected() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_data_file() {
        let mut config = AppConfig::default();
        config.data_file = Some(PathBuf::new());

        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.ticker.seed, parsed.ticker.seed);
        assert_eq!(config.language, parsed.language);
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "data_file = \"matches.csv\"").unwrap();
        writeln!(file, "language = \"en\"").unwrap();
        writeln!(file, "[server]").unwrap();
        writeln!(file, "port = 9000").unwrap();
        writeln!(file, "[ticker]").unwrap();
        writeln!(file, "seed = 7").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.data_file, Some(PathBuf::from("matches.csv")));
        assert_eq!(config.language, Language::En);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.ticker.seed, 7);
        assert!(config.ticker.enabled);
    }

    #[test]
    fn test_from_file_errors() {
        let missing = AppConfig::from_file(Path::new("/nonexistent/matchday.toml"));
        assert!(matches!(missing, Err(ConfigError::ReadError(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server").unwrap();
        assert!(matches!(AppConfig::from_file(file.path()), Err(ConfigError::ParseError(_))));
    }
}
