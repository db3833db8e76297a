use std::fmt;
use std::time::Duration;

use crate::error::{ApiError, Result};
use crate::transport::DEFAULT_TIMEOUT;

/// Public Campaign Monitor v3.1 API.
pub const DEFAULT_BASE_URL: &str = "https://api.createsend.com/api/v3.1/";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "CREATESEND_API_KEY";

/// Optional environment override for the base URL.
pub const BASE_URL_ENV: &str = "CREATESEND_BASE_URL";

pub fn default_user_agent() -> String {
    format!("createsend-rs/{}", env!("CARGO_PKG_VERSION"))
}

/// Settings for constructing an authenticated `ApiClient`.
#[derive(Clone)]
pub struct ClientConfig {
    /// Shared-secret API key sent as the Basic auth username.
    pub api_key: String,
    /// Absolute base URL; relative request paths resolve against it.
    pub base_url: String,
    /// Sent as `User-Agent` on every request.
    pub user_agent: String,
    /// Log the body of unexpected (non-2xx, non-400) responses.
    pub log_response_bodies: bool,
    /// Request timeout for the default transport. `None` disables it.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: default_user_agent(),
            log_response_bodies: false,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }

    /// Reads [`API_KEY_ENV`] and, if present, [`BASE_URL_ENV`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(API_KEY_ENV)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ApiError::MissingEnv(API_KEY_ENV))?;
        let mut config = Self::new(api_key.trim());
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|url| !url.trim().is_empty()) {
            config.base_url = base_url.trim().to_string();
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_response_logging(mut self, enabled: bool) -> Self {
        self.log_response_bodies = enabled;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("log_response_bodies", &self.log_response_bodies)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_point_at_public_api() {
        let config = ClientConfig::new("key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.user_agent.starts_with("createsend-rs/"));
        assert!(!config.log_response_bodies);
        assert_eq!(config.timeout, Some(DEFAULT_TIMEOUT));
    }

    #[test]
    fn from_lookup_requires_api_key() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ApiError::MissingEnv(API_KEY_ENV)));

        let err = ClientConfig::from_lookup(lookup(&[(API_KEY_ENV, "  ")])).unwrap_err();
        assert!(matches!(err, ApiError::MissingEnv(_)));
    }

    #[test]
    fn from_lookup_reads_base_url_override() {
        let config = ClientConfig::from_lookup(lookup(&[
            (API_KEY_ENV, "abc"),
            (BASE_URL_ENV, "http://127.0.0.1:3000/api/v3.1/"),
        ]))
        .unwrap();
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.base_url, "http://127.0.0.1:3000/api/v3.1/");
    }

    #[test]
    fn debug_output_hides_api_key() {
        let config = ClientConfig::new("very-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("very-secret"));
    }
}
