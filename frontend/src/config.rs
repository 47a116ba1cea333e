//! Client configuration.
//!
//! The backend base URL is read once at start-up and never changes afterwards.
//! `FINANCE_API_BASE_URL` plays the role the bundler environment variable
//! played for the web client.

use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

pub const BASE_URL_ENV: &str = "FINANCE_API_BASE_URL";
pub const TIMEOUT_ENV: &str = "FINANCE_API_TIMEOUT_SECS";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid timeout '{0}': expected a whole number of seconds")]
    InvalidTimeout(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Always ends with `/` so endpoint paths join underneath it
    pub base_url: Url,
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            timeout: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(BASE_URL_ENV)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(BASE_URL_ENV))?;
        let mut config = Self::new(&base_url)?;

        if let Some(raw) = lookup(TIMEOUT_ENV).filter(|v| !v.trim().is_empty()) {
            config.timeout = Some(parse_timeout_secs(&raw)?);
        }

        Ok(config)
    }
}

pub fn parse_timeout_secs(raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| ConfigError::InvalidTimeout(raw.to_string()))
}

fn normalize_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot be used as a base".to_string()));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
