//! Configuration module for akj-pay.
//!
//! Handles loading configuration from the TOML file and CLI/environment
//! overrides, and validates it into an [`akj_core::config::FlowConfig`].

pub mod file;

use crate::config::file::FileConfig;
use akj_core::config::FlowConfig;
use akj_core::poller::PollSchedule;
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

    #[error("invalid base url: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Loaded configuration result containing all parts.
#[derive(Debug)]
pub struct LoadedConfig {
    pub flow: FlowConfig,
    pub session_path: PathBuf,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    base_url_override: Option<Url>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, base_url_override: Option<Url>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            base_url_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file (a missing file means all defaults)
    /// 2. Apply the base URL override
    /// 3. Validate the configuration
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let file_config = match std::fs::read_to_string(&self.config_path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    "Config file {:?} not found, using defaults",
                    self.config_path
                );
                FileConfig::default()
            }
            Err(e) => return Err(e.into()),
        };
        self.build(file_config)
    }

    fn build(&self, file_config: FileConfig) -> Result<LoadedConfig, ConfigError> {
        let base_url = match &self.base_url_override {
            Some(url) => url.clone(),
            None => Url::parse(&file_config.backend.base_url)?,
        };
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError(format!(
                "base url must be http(s), got {}",
                base_url.scheme()
            )));
        }

        let create_link_timeout = non_zero_secs(
            "backend.create_link_timeout_secs",
            file_config.backend.create_link_timeout_secs,
        )?;
        let verify_timeout = non_zero_secs(
            "backend.verify_timeout_secs",
            file_config.backend.verify_timeout_secs,
        )?;
        let interval = non_zero_secs("polling.interval_secs", file_config.polling.interval_secs)?;
        let session_timeout = non_zero_secs(
            "polling.session_timeout_secs",
            file_config.polling.session_timeout_secs,
        )?;
        if interval > session_timeout {
            return Err(ConfigError::ValidationError(
                "polling.interval_secs exceeds polling.session_timeout_secs".to_string(),
            ));
        }
        if verify_timeout > interval {
            tracing::debug!(
                ?verify_timeout,
                ?interval,
                "Verify timeout exceeds poll interval, slow calls will skip ticks"
            );
        }

        Ok(LoadedConfig {
            flow: FlowConfig {
                base_url,
                create_link_timeout,
                verify_timeout,
                schedule: PollSchedule {
                    interval,
                    session_timeout,
                },
            },
            session_path: file_config.session.path,
        })
    }
}

/// Upper bound for every configured duration.
const MAX_DURATION_SECS: u64 = 24 * 60 * 60;

fn non_zero_secs(key: &str, secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::ValidationError(format!(
            "{key} must be greater than zero"
        )));
    }
    if secs > MAX_DURATION_SECS {
        return Err(ConfigError::ValidationError(format!(
            "{key} must be at most {MAX_DURATION_SECS} seconds"
        )));
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader(base_url_override: Option<&str>) -> ConfigLoader {
        ConfigLoader::new(
            "./does-not-exist.toml",
            base_url_override.map(|u| Url::parse(u).unwrap()),
        )
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let loaded = loader(None).load().unwrap();
        assert_eq!(
            loaded.flow.base_url.as_str(),
            "https://akj.brightechsoftware.com/"
        );
        assert_eq!(loaded.flow.schedule, PollSchedule::default());
        assert_eq!(loaded.flow.create_link_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_base_url_override() {
        let loaded = loader(Some("http://127.0.0.1:8080")).load().unwrap();
        assert_eq!(loaded.flow.base_url.as_str(), "http://127.0.0.1:8080/");
    }

    #[test]
    fn test_rejects_zero_interval() {
        let mut config = FileConfig::default();
        config.polling.interval_secs = 0;
        assert!(matches!(
            loader(None).build(config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_rejects_interval_longer_than_session() {
        let mut config = FileConfig::default();
        config.polling.interval_secs = 600;
        assert!(matches!(
            loader(None).build(config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_rejects_durations_over_one_day() {
        let mut config = FileConfig::default();
        config.polling.interval_secs = u64::MAX;
        config.polling.session_timeout_secs = u64::MAX;
        assert!(matches!(
            loader(None).build(config),
            Err(ConfigError::ValidationError(msg)) if msg.contains("polling.interval_secs")
        ));

        let mut config = FileConfig::default();
        config.backend.verify_timeout_secs = MAX_DURATION_SECS + 1;
        assert!(loader(None).build(config).is_err());

        let mut config = FileConfig::default();
        config.polling.session_timeout_secs = MAX_DURATION_SECS;
        assert!(loader(None).build(config).is_ok());
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let mut config = FileConfig::default();
        config.backend.base_url = "ftp://akj.example.com".to_string();
        assert!(matches!(
            loader(None).build(config),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
