use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub appdir: Option<String>,
    #[serde(default)]
    pub omdb: OmdbConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(skip)]
    pub debug_logs: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default)]
    pub tlscert: Option<String>,
    #[serde(default)]
    pub tlskey: Option<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
            tlscert: None,
            tlskey: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OmdbConfig {
    #[serde(alias = "api_key", rename = "apikey")]
    #[serde(default)]
    pub api_key: String,
    #[serde(alias = "base_url", rename = "baseurl")]
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }
}

impl OmdbConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Search criteria used when a request or the location carries none.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: Option<i64>,
}

impl DefaultsConfig {
    /// The default year as form text; empty when unset.
    pub fn year_text(&self) -> String {
        self.year.map(|y| y.to_string()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ValidationConfig {
    /// Check the year against 1900..=2050 instead of the permissive rule.
    #[serde(default)]
    pub strict_year: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScrollConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Minimum milliseconds between two firings; 0 disables throttling.
    #[serde(default)]
    pub throttle_ms: u64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            throttle_ms: 0,
        }
    }
}

impl ScrollConfig {
    pub fn throttle(&self) -> Option<Duration> {
        (self.throttle_ms > 0).then(|| Duration::from_millis(self.throttle_ms))
    }
}

fn default_port() -> String {
    "3000".to_string()
}

fn default_base_url() -> String {
    "http://www.omdbapi.com/".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_threshold() -> f64 {
    500.0
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        Self::from_yaml(&content).map_err(|e| ConfigError::ParseError(path.to_string(), e))
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Apply the deployment's environment variables on top of the file.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("API_KEY") {
            self.omdb.api_key = key;
        }
        if let Some(title) = lookup("DEFAULT_TITLE") {
            self.defaults.title = title;
        }
        if let Some(year) = lookup("DEFAULT_YEAR") {
            let year = year.trim();
            self.defaults.year = if year.is_empty() {
                None
            } else {
                Some(
                    year.parse()
                        .map_err(|_| ConfigError::InvalidValue("DEFAULT_YEAR", year.to_string()))?,
                )
            };
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
