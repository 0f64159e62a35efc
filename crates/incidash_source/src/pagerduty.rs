use std::fmt;

use incidash_core::domain::Incident;
use incidash_core::error::AppError;
use incidash_core::source::IncidentSource;
use tracing::debug;

use crate::config::{validate_limit, SourceConfig, ACCEPT_MEDIA_TYPE};
use crate::feed::IncidentFeed;
use crate::http::{call_text, decode_incidents, ensure_json, parse_json};

/// Credentialed client for the incident-management API. Single attempt, no retry.
#[derive(Clone)]
pub struct PagerDutyClient {
    config: SourceConfig,
    agent: ureq::Agent,
}

impl PagerDutyClient {
    pub fn new(config: SourceConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout()).build();
        Self { config, agent }
    }

    fn incidents_url(&self) -> String {
        format!("{}/incidents", self.config.base_url())
    }
}

impl fmt::Debug for PagerDutyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagerDutyClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl IncidentFeed for PagerDutyClient {
    fn fetch_raw(&self, limit: u32) -> Result<String, AppError> {
        let limit = validate_limit(limit)?;
        let url = self.incidents_url();
        debug!(%url, limit, "fetching incidents");

        let request = self
            .agent
            .get(&url)
            .set("Authorization", &self.config.authorization())
            .set("Accept", ACCEPT_MEDIA_TYPE)
            .set("Content-Type", "application/json")
            .query("limit", &limit.to_string());

        let body = call_text(request, &url)?;
        ensure_json(&body, &url)?;
        Ok(body)
    }
}

impl IncidentSource for PagerDutyClient {
    fn fetch_incidents(&self, limit: u32) -> Result<Vec<Incident>, AppError> {
        let body = self.fetch_raw(limit)?;
        decode_incidents(&parse_json(&body, &self.incidents_url())?)
    }
}
