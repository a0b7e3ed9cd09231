//! Configuration management for dexscrape
//!
//! Configuration is read from `./config/dexscrape.toml` when it exists.
//! The same file is embedded in the binary and used as the fallback, so the
//! tool runs without any configuration on disk.

use serde::Deserialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration file path relative to working directory
pub const CONFIG_PATH: &str = "./config/dexscrape.toml";

/// Default configuration file content
pub const DEFAULT_CONFIG: &str = include_str!("../config/dexscrape.toml");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found at {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid URL in '{field}': {url}")]
    InvalidUrl { field: String, url: String },

    #[error("Configuration field '{field}' cannot be empty")]
    EmptyRequired { field: String },
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub base_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
}

/// Batch run configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    /// Pause between consecutive requests (milliseconds)
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    /// Output file used when the command line names none
    #[serde(default = "default_output")]
    pub default_output: String,
}

fn default_request_delay_ms() -> u64 {
    1000
}

fn default_output() -> String {
    "processed_output.md".to_string()
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: default_request_delay_ms(),
            default_output: default_output(),
        }
    }
}

impl AppConfig {
    /// Load from an explicit path, the default path, or the embedded defaults,
    /// in that order
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_from_path(path),
            None => {
                let default_path = Path::new(CONFIG_PATH);
                if default_path.exists() {
                    Self::load_from_path(default_path)
                } else {
                    Self::embedded()
                }
            }
        }
    }

    /// Configuration built from the embedded default file
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_toml(DEFAULT_CONFIG)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.http.base_url.starts_with("https://") || self.http.base_url.starts_with("http://")) {
            return Err(ConfigError::InvalidUrl {
                field: "http.base_url".to_string(),
                url: self.http.base_url.clone(),
            });
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(ConfigError::EmptyRequired {
                field: "http.user_agent".to_string(),
            });
        }
        if self.http.request_timeout_secs == 0 {
            return Err(ConfigError::EmptyRequired {
                field: "http.request_timeout_secs".to_string(),
            });
        }
        if self.batch.default_output.trim().is_empty() {
            return Err(ConfigError::EmptyRequired {
                field: "batch.default_output".to_string(),
            });
        }

        Ok(())
    }

    /// Create default configuration file at the standard location
    pub fn create_default_config() -> Result<PathBuf, ConfigError> {
        let path = Path::new(CONFIG_PATH);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = fs::File::create(path)?;
        file.write_all(DEFAULT_CONFIG.as_bytes())?;

        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses_and_validates() {
        let config = AppConfig::embedded();
        assert!(config.is_ok(), "Default config should load: {:?}", config.err());

        let config = config.unwrap();
        assert_eq!(config.http.base_url, "https://bulbapedia.bulbagarden.net");
        assert_eq!(config.http.request_timeout_secs, 10);
        assert_eq!(config.batch.request_delay_ms, 1000);
        assert_eq!(config.batch.default_output, "processed_output.md");
    }

    #[test]
    fn test_batch_section_is_optional() {
        let config_str = r#"
[http]
base_url = "http://localhost:8080"
user_agent = "test/1.0"
request_timeout_secs = 3
"#;

        let config = AppConfig::from_toml(config_str).expect("Config should parse without batch section");
        assert_eq!(config.batch.request_delay_ms, 1000, "request_delay_ms should default to 1000");
        assert_eq!(config.batch.default_output, "processed_output.md");
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let config_str = r#"
[http]
base_url = "ftp://bulbapedia.bulbagarden.net"
user_agent = "test/1.0"
request_timeout_secs = 3
"#;

        let err = AppConfig::from_toml(config_str).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn test_rejects_zero_timeout_and_empty_user_agent() {
        let zero_timeout = r#"
[http]
base_url = "https://bulbapedia.bulbagarden.net"
user_agent = "test/1.0"
request_timeout_secs = 0
"#;
        assert!(matches!(
            AppConfig::from_toml(zero_timeout),
            Err(ConfigError::EmptyRequired { .. })
        ));

        let empty_agent = r#"
[http]
base_url = "https://bulbapedia.bulbagarden.net"
user_agent = "  "
request_timeout_secs = 10
"#;
        assert!(matches!(
            AppConfig::from_toml(empty_agent),
            Err(ConfigError::EmptyRequired { .. })
        ));
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/dexscrape.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = AppConfig::from_toml("[http\nbase_url = ").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
