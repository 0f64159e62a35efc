use std::fmt;
use std::time::Duration;

use incidash_core::error::{AppError, SOURCE_CONFIG_INVALID};

pub const DEFAULT_SOURCE_URL: &str = "https://api.pagerduty.com";
/// Versioned media type required by the incident source.
pub const ACCEPT_MEDIA_TYPE: &str = "application/vnd.pagerduty+json;version=2";
/// Page maximum enforced by the incident source.
pub const MAX_FETCH_LIMIT: u32 = 100;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

fn validate_base_url(base_url: &str) -> Result<String, AppError> {
    let base_url = base_url.trim().trim_end_matches('/').to_string();
    let rest = base_url
        .strip_prefix("https://")
        .or_else(|| base_url.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.contains('@') => Ok(base_url),
        _ => Err(
            AppError::new(SOURCE_CONFIG_INVALID, "Base URL must be an http(s) origin")
                .with_details(format!("base_url={base_url}")),
        ),
    }
}

/// Reject page sizes outside `1..=MAX_FETCH_LIMIT`.
pub fn validate_limit(limit: u32) -> Result<u32, AppError> {
    if (1..=MAX_FETCH_LIMIT).contains(&limit) {
        Ok(limit)
    } else {
        Err(
            AppError::new(SOURCE_CONFIG_INVALID, "Fetch limit out of range")
                .with_details(format!("limit={limit}; max={MAX_FETCH_LIMIT}")),
        )
    }
}

/// Connection settings for the credentialed incident source.
///
/// `Debug` redacts the API key; it must never reach logs or client responses.
#[derive(Clone)]
pub struct SourceConfig {
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl SourceConfig {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, AppError> {
        let base_url = validate_base_url(base_url)?;
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(AppError::new(
                SOURCE_CONFIG_INVALID,
                "Incident source API key is missing",
            ));
        }
        Ok(Self {
            base_url,
            api_key: api_key.to_string(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn authorization(&self) -> String {
        format!("Token token={}", self.api_key)
    }
}

impl fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Validated origin of a running proxy.
pub(crate) fn proxy_base_url(base_url: &str) -> Result<String, AppError> {
    validate_base_url(base_url)
}
