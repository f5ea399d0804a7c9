//! TOML file configuration structures.
//!
//! These structs directly map to the `akj-pay.toml` file format. Every key
//! is optional.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub backend: BackendConfig,
    pub polling: PollingConfig,
    pub session: SessionConfig,
}

/// Payment backend endpoint and request bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub create_link_timeout_secs: u64,
    pub verify_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: akj_sdk::DEFAULT_BASE_URL.to_string(),
            create_link_timeout_secs: 30,
            verify_timeout_secs: 10,
        }
    }
}

/// Verification polling cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub interval_secs: u64,
    pub session_timeout_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: 5,
            session_timeout_secs: 300,
        }
    }
}

/// Where the signed-in session is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./akj-session.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let toml_str = r#"
[backend]
base_url = "https://staging.example.com"
create_link_timeout_secs = 45
verify_timeout_secs = 8

[polling]
interval_secs = 3
session_timeout_secs = 120

[session]
path = "/var/lib/akj/session.json"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.base_url, "https://staging.example.com");
        assert_eq!(config.backend.create_link_timeout_secs, 45);
        assert_eq!(config.polling.interval_secs, 3);
        assert_eq!(config.session.path, PathBuf::from("/var/lib/akj/session.json"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml_str = r#"
[polling]
session_timeout_secs = 600
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.base_url, akj_sdk::DEFAULT_BASE_URL);
        assert_eq!(config.backend.verify_timeout_secs, 10);
        assert_eq!(config.polling.interval_secs, 5);
        assert_eq!(config.polling.session_timeout_secs, 600);
    }

    #[test]
    fn test_empty_config() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.polling.session_timeout_secs, 300);
        assert_eq!(config.session.path, PathBuf::from("./akj-session.json"));
    }
}
