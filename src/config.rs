//! Harness configuration.
//!
//! The only external input the harness needs is the mock server's base URL,
//! supplied through the `BASE_URL` environment variable (the same variable
//! the mock's own deployment checks use). The base URL is expected to point
//! at the `/llm` route set, e.g. `https://httpbun.example/llm`; surface
//! clients join their endpoint paths onto it.

use crate::error::{ConformanceError, ConformanceResult};
use crate::logging::log_debug;
use std::time::Duration;

/// Environment variable supplying the mock server's base URL.
pub const BASE_URL_ENV: &str = "BASE_URL";

/// Placeholder credential sent with every request.
///
/// The mock never validates credentials; clients still send one the way a
/// real SDK would, so header handling stays on the tested path.
pub const PLACEHOLDER_API_KEY: &str = "dummy-key";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration shared by all surface clients.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Base URL of the mock server's LLM route set, without a trailing slash.
    pub base_url: String,

    /// Credential passed to the mock (never validated there).
    pub api_key: String,

    /// Per-request timeout applied to the underlying HTTP client.
    pub request_timeout: Duration,
}

impl HarnessConfig {
    /// Create a configuration for an explicit base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            api_key: PLACEHOLDER_API_KEY.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Read the configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConformanceError::ConfigurationError`] if `BASE_URL` is
    /// unset or empty.
    pub fn from_env() -> ConformanceResult<Self> {
        let base_url = std::env::var(BASE_URL_ENV).map_err(|_| {
            ConformanceError::configuration_error(format!(
                "{BASE_URL_ENV} environment variable is not set"
            ))
        })?;

        if base_url.trim().is_empty() {
            return Err(ConformanceError::configuration_error(format!(
                "{BASE_URL_ENV} environment variable is empty"
            )));
        }

        let config = Self::new(base_url.trim());
        config.validate()?;

        log_debug!(base_url = %config.base_url, "Harness configuration loaded from environment");
        Ok(config)
    }

    /// Replace the placeholder credential.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Replace the per-request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConformanceError::ConfigurationError`] if the base URL is
    /// empty or does not use an HTTP scheme.
    pub fn validate(&self) -> ConformanceResult<()> {
        if self.base_url.is_empty() {
            return Err(ConformanceError::configuration_error(
                "Base URL must not be empty",
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConformanceError::configuration_error(format!(
                "Base URL must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        Ok(())
    }

    /// Join an endpoint path onto the base URL.
    pub(crate) fn endpoint_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Strip trailing slashes so endpoint joins are deterministic.
fn normalize_base_url(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}
