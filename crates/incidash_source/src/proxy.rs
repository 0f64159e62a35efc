use std::fmt;
use std::time::Duration;

use incidash_core::domain::Incident;
use incidash_core::error::AppError;
use incidash_core::source::IncidentSource;
use tracing::debug;

use crate::config::{proxy_base_url, validate_limit, DEFAULT_TIMEOUT};
use crate::http::{call_text, decode_incidents, parse_json};

/// Route served by the proxy.
pub const INCIDENTS_ROUTE: &str = "/api/incidents";

/// Uncredentialed client that reads incidents through a running proxy.
#[derive(Clone)]
pub struct ProxyClient {
    base_url: String,
    agent: ureq::Agent,
}

impl ProxyClient {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let base_url = proxy_base_url(base_url)?;
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Ok(Self { base_url, agent })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl fmt::Debug for ProxyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl IncidentSource for ProxyClient {
    fn fetch_incidents(&self, limit: u32) -> Result<Vec<Incident>, AppError> {
        let limit = validate_limit(limit)?;
        let url = format!("{}{INCIDENTS_ROUTE}", self.base_url);
        debug!(%url, limit, "fetching incidents via proxy");

        let request = self.agent.get(&url).query("limit", &limit.to_string());
        let body = call_text(request, &url)?;
        decode_incidents(&parse_json(&body, &url)?)
    }
}
