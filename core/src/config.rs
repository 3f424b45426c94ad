//! Client configuration.

use std::env;
use std::time::Duration;

use crate::error::ApiError;

/// Root URL of the IGDB v3 API.
pub const DEFAULT_ROOT_URL: &str = "https://api-v3.igdb.com/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_API_KEY: &str = "IGDB_API_KEY";
pub const ENV_ROOT_URL: &str = "IGDB_ROOT_URL";
pub const ENV_TIMEOUT_SECS: &str = "IGDB_TIMEOUT_SECS";

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_key: String,
    root_url: String,
    timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            root_url: DEFAULT_ROOT_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Point the client at another root, e.g. a local mock server. A single
    /// trailing slash is enforced.
    pub fn with_root_url(mut self, root_url: &str) -> Self {
        self.root_url = format!("{}/", root_url.trim_end_matches('/'));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load from `IGDB_API_KEY`, `IGDB_ROOT_URL` and `IGDB_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let api_key = lookup(ENV_API_KEY)
            .filter(|k| !k.trim().is_empty())
            .ok_or(ApiError::MissingApiKey)?;
        let mut config = Self::new(api_key.trim());

        if let Some(root) = lookup(ENV_ROOT_URL).filter(|r| !r.trim().is_empty()) {
            config = config.with_root_url(root.trim());
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ApiError::Config(format!("{ENV_TIMEOUT_SECS} must be whole seconds, got {secs:?}"))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

// Hand-written so the API key never reaches logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("root_url", &self.root_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::new("key");
        assert_eq!(config.root_url(), DEFAULT_ROOT_URL);
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn root_url_gets_exactly_one_trailing_slash() {
        let a = ClientConfig::new("k").with_root_url("http://localhost:3000");
        let b = ClientConfig::new("k").with_root_url("http://localhost:3000//");
        assert_eq!(a.root_url(), "http://localhost:3000/");
        assert_eq!(b.root_url(), "http://localhost:3000/");
    }

    #[test]
    fn from_env_requires_api_key() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ApiError::MissingApiKey);

        let err = ClientConfig::from_lookup(lookup(&[(ENV_API_KEY, "  ")])).unwrap_err();
        assert_eq!(err, ApiError::MissingApiKey);
    }

    #[test]
    fn from_env_reads_optional_values() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "secret"),
            (ENV_ROOT_URL, "http://127.0.0.1:9000"),
            (ENV_TIMEOUT_SECS, "5"),
        ]))
        .unwrap();
        assert_eq!(config.api_key(), "secret");
        assert_eq!(config.root_url(), "http://127.0.0.1:9000/");
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn from_env_rejects_bad_timeout() {
        let err = ClientConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "secret"),
            (ENV_TIMEOUT_SECS, "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn debug_redacts_api_key() {
        let rendered = format!("{:?}", ClientConfig::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
    }
}
