//! Configuration module for herald-server.
//!
//! Handles loading configuration from an optional TOML file and merging it
//! with the listen address resolved from CLI arguments and environment.

pub mod file;
pub mod runtime;

use crate::config::file::FileConfig;
use crate::config::runtime::{DedupConfig, ServerConfig, SlackConfig};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("invalid slack base_url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Loaded configuration result containing all parts.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub dedup: DedupConfig,
    pub slack: SlackConfig,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    listen: SocketAddr,
}

impl ConfigLoader {
    /// Create a new config loader.
    ///
    /// `listen` is already resolved from `--host` / `--port` / `PORT`.
    pub fn new(config_path: Option<&Path>, listen: SocketAddr) -> Self {
        Self {
            config_path: config_path.map(Path::to_path_buf),
            listen,
        }
    }

    /// Load and validate the configuration.
    ///
    /// Without a config file every section takes its defaults.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let file_config = match &self.config_path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                toml::from_str(&content)?
            }
            None => FileConfig::default(),
        };
        self.build(file_config)
    }

    /// Validate a parsed file and turn it into runtime configuration.
    pub fn build(&self, file_config: FileConfig) -> Result<LoadedConfig, ConfigError> {
        self.validate(&file_config)?;

        let base_url = Url::parse(&file_config.slack.base_url)?;

        Ok(LoadedConfig {
            server: ServerConfig {
                listen: self.listen,
            },
            dedup: DedupConfig {
                ttl: Duration::from_secs(file_config.dedup.ttl_secs),
                sweep_interval: Duration::from_secs(file_config.dedup.sweep_interval_secs),
            },
            slack: SlackConfig {
                base_url,
                username: file_config.slack.username,
                icon_url: file_config.slack.icon_url,
                timeout: Duration::from_secs(file_config.slack.timeout_secs),
            },
        })
    }

    fn validate(&self, config: &FileConfig) -> Result<(), ConfigError> {
        if config.dedup.ttl_secs == 0 {
            return Err(ConfigError::ValidationError(
                "dedup.ttl_secs must be greater than zero".to_string(),
            ));
        }
        if config.dedup.sweep_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "dedup.sweep_interval_secs must be greater than zero".to_string(),
            ));
        }
        if config.slack.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "slack.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn loader(path: Option<&Path>) -> ConfigLoader {
        ConfigLoader::new(path, SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 5000))
    }

    #[test]
    fn test_defaults_without_file() {
        let loaded = loader(None).load().unwrap();
        assert_eq!(loaded.server.listen.port(), 5000);
        assert_eq!(loaded.dedup.ttl, Duration::from_secs(300));
        assert_eq!(loaded.dedup.sweep_interval, Duration::from_secs(60));
        assert_eq!(loaded.slack.base_url.as_str(), "https://hooks.slack.com/");
        assert_eq!(loaded.slack.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let mut file = FileConfig::default();
        file.dedup.ttl_secs = 0;
        let err = loader(None).build(file).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let mut file = FileConfig::default();
        file.slack.base_url = "not a url".to_string();
        let err = loader(None).build(file).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = loader(Some(Path::new("/nonexistent/herald.toml")))
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }

    #[test]
    fn test_file_is_read() {
        let path = std::env::temp_dir().join(format!("herald-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[dedup]\nttl_secs = 42\n").unwrap();
        let loaded = loader(Some(&path)).load();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.unwrap().dedup.ttl, Duration::from_secs(42));
    }
}
