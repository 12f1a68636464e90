//! Build-time client configuration and storage keys.

use std::time::Duration;

// =========================================================
// Build-time configuration
// =========================================================

/// Defaults used when the build environment does not define the variable.
const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_MODE: &str = "development";
const SITE_NAME: &str = "MedScore";

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);
// Classification runs several LLM passes server-side.
const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(180);

/// Storage key holding the bearer token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Storage key holding the serialized session.
pub const SESSION_STORE_KEY: &str = "medscore:session";

/// Client configuration.
///
/// `MEDSCORE_API_URL` and `MEDSCORE_MODE` are read at compile time, since a
/// static browser bundle has no process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub site_name: String,
    pub mode: String,
    pub api_url: String,
    pub fetch_timeout: Duration,
    pub submit_timeout: Duration,
}

impl ClientConfig {
    pub fn from_build_env() -> Self {
        Self::from_vars(option_env!("MEDSCORE_API_URL"), option_env!("MEDSCORE_MODE"))
    }

    fn from_vars(api_url: Option<&str>, mode: Option<&str>) -> Self {
        let api_url = api_url
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_API_URL);
        Self {
            site_name: SITE_NAME.to_string(),
            mode: mode
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(DEFAULT_MODE)
                .to_string(),
            api_url: api_url.trim_end_matches('/').to_string(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            submit_timeout: DEFAULT_SUBMIT_TIMEOUT,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_vars(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = ClientConfig::from_vars(None, Some("  "));
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.mode, DEFAULT_MODE);
        assert_eq!(cfg.site_name, "MedScore");
    }

    #[test]
    fn api_url_is_trimmed() {
        let cfg = ClientConfig::from_vars(Some("https://api.example.com///"), Some("production"));
        assert_eq!(cfg.api_url, "https://api.example.com");
        assert_eq!(cfg.mode, "production");

        let cfg = cfg.with_api_url("http://x/");
        assert_eq!(cfg.api_url, "http://x");
    }
}
