//! API client configuration

use std::env;
use std::time::Duration;

use reqwest::Url;

use crate::error::{DashboardError, Result};

/// Default API location when nothing is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_BASE_URL: &str = "AGENCY_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "AGENCY_API_TIMEOUT_SECS";
pub const ENV_TOKEN: &str = "AGENCY_API_TOKEN";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Root of the REST API; always ends with '/'
    pub base_url: String,

    pub timeout_secs: u64,

    /// Pre-issued bearer token; skips the login call when set
    pub token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            token: None,
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with `AGENCY_API_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env` but reads values through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BASE_URL) {
            config = config.with_base_url(&url);
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs = raw.trim().parse().map_err(|_| {
                DashboardError::Config(format!("{} must be a whole number of seconds, got {:?}", ENV_TIMEOUT_SECS, raw))
            })?;
        }

        config.token = lookup(ENV_TOKEN).filter(|t| !t.trim().is_empty());

        config.validate()?;
        Ok(config)
    }

    /// Replace the base URL, adding the trailing '/' that relative joins need
    pub fn with_base_url(mut self, url: &str) -> Self {
        let url = url.trim();
        self.base_url = if url.ends_with('/') {
            url.to_string()
        } else {
            format!("{}/", url)
        };
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parsed base URL
    pub fn url(&self) -> Result<Url> {
        Url::parse(&self.base_url)
            .map_err(|e| DashboardError::Config(format!("invalid base URL {:?}: {}", self.base_url, e)))
    }

    pub fn validate(&self) -> Result<()> {
        self.url()?;
        if self.timeout_secs == 0 {
            return Err(DashboardError::Config("timeout must be at least one second".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_env_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (ENV_BASE_URL, "https://agency.example.com/api"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_TOKEN, "abc"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://agency.example.com/api/");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(ClientConfig::from_lookup(lookup_from(&[(ENV_TIMEOUT_SECS, "soon")])).is_err());
        assert!(ClientConfig::from_lookup(lookup_from(&[(ENV_TIMEOUT_SECS, "0")])).is_err());
        assert!(ClientConfig::from_lookup(lookup_from(&[(ENV_BASE_URL, "not a url")])).is_err());
    }

    #[test]
    fn test_blank_token_ignored() {
        let config = ClientConfig::from_lookup(lookup_from(&[(ENV_TOKEN, "  ")])).unwrap();
        assert_eq!(config.token, None);
    }
}
