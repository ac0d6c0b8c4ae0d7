//! Service configuration
//!
//! Handles the base URL and transport options of the analysis service.

use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Base URL used when `PWD_SERVICE_URL` is not set.
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8000";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid service URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Invalid request timeout '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),
}

/// Connection settings for the analysis service.
///
/// Built once at startup and handed to [`crate::HttpClient::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    base_url: Url,
    /// Transport timeout. `None` means the client waits until the
    /// transport itself resolves or fails.
    pub request_timeout: Option<Duration>,
}

impl ServiceConfig {
    /// Creates a configuration for the given base URL, without timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if the URL cannot be parsed or
    /// is not an `http`/`https` URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            request_timeout: None,
        })
    }

    /// Builds the configuration from environment variables.
    ///
    /// Priority for the base URL:
    /// 1. Environment variable `PWD_SERVICE_URL`
    /// 2. Default [`DEFAULT_SERVICE_URL`]
    ///
    /// `PWD_SERVICE_TIMEOUT_SECS` optionally sets a transport timeout.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = std::env::var("PWD_SERVICE_URL").unwrap_or_else(|_| DEFAULT_SERVICE_URL.to_string());
        let mut config = Self::new(&url)?;

        if let Ok(raw) = std::env::var("PWD_SERVICE_TIMEOUT_SECS") {
            config.request_timeout = Some(parse_timeout(&raw)?);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("Service configuration loaded: {}", config.base_url);

        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Base URL, always ending with `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves an endpoint path (e.g. `generate/passphrase`) against the base URL.
    pub fn endpoint(&self, path: &str) -> Url {
        // A directory-form base URL with a relative path cannot fail to join.
        self.base_url
            .join(path.trim_start_matches('/'))
            .unwrap_or_else(|_| self.base_url.clone())
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("not a base URL".to_string()));
    }

    // Directory form, so that joining keeps any path prefix
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}
