//! Configuration for the Aura Hub client.
//!
//! The API base address is process-wide state initialized once at startup:
//! environment variable first, hardcoded local fallback otherwise, CLI flag
//! winning over both. After startup nothing reads the environment again;
//! the resolved [`Settings`] value is injected into the API client.

use std::time::Duration;

/// Environment variable naming the API base URL.
pub const API_URL_ENV: &str = "AURA_API_URL";

/// Fallback base URL when neither the environment nor the CLI supplies one.
pub const DEFAULT_API_URL: &str = "http://localhost:8001";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolved application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the Aura Hub API, without a trailing slash.
    pub api_base_url: String,
    /// Request timeout for all API calls.
    pub request_timeout: Duration,
    /// Re-run a zero-hit keyword search as a semantic search.
    pub semantic_fallback: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            semantic_fallback: false,
        }
    }
}

impl Settings {
    /// Build settings from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let api_base_url = std::env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Self {
            api_base_url: normalize_base_url(api_base_url),
            ..Default::default()
        }
    }

    /// Override the base URL (CLI flag takes precedence over environment).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.api_base_url = normalize_base_url(base_url.to_string());
        self
    }

    pub fn with_semantic_fallback(mut self, enabled: bool) -> Self {
        self.semantic_fallback = enabled;
        self
    }
}

/// Strip trailing slashes so endpoint paths can always be appended verbatim.
fn normalize_base_url(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_point_at_local_api() {
        let settings = Settings::default();
        assert_eq!(settings.api_base_url, "http://localhost:8001");
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert!(!settings.semantic_fallback);
    }

    #[test]
    fn base_url_override_strips_trailing_slash() {
        let settings = Settings::default().with_base_url("https://hub.example.org/");
        assert_eq!(settings.api_base_url, "https://hub.example.org");

        let settings = Settings::default().with_base_url("https://hub.example.org//");
        assert_eq!(settings.api_base_url, "https://hub.example.org");
    }
}
