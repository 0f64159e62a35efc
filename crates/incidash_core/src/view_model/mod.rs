use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::domain::Incident;
use crate::error::{AppError, FetchFailureKind};
use crate::fallback::fallback_incidents;
use crate::filter::actions::{FilterAction, SortAction};
use crate::filter::{derive_incidents, FilterConfig, SortConfig};
use crate::source::{IncidentSource, DEFAULT_FETCH_LIMIT};
use crate::summary::StatusBreakdown;

mod row;

pub use row::{IncidentRow, StatusTone};

/// One-shot notice raised whenever a load ends in the fallback data set.
pub const FALLBACK_NOTICE: &str = "Failed to fetch incidents. Using mock data.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FallbackReason {
    FetchFailed,
    EmptyResult,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Live,
    Fallback(FallbackReason),
}

/// Identifies one outstanding load. Completions carrying a stale ticket are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Owns the loaded incident list and the active filter/sort configuration.
///
/// Notes:
/// - The incident list is replaced only by a completed load; filters and sorting never
///   touch it.
/// - At most one load is outstanding. After [`IncidentViewModel::teardown`] no load can start
///   and late completions are dropped.
/// - The notice is held until [`IncidentViewModel::take_notice`]; rendering never re-raises it.
#[derive(Debug, Clone)]
pub struct IncidentViewModel {
    state: LoadState,
    incidents: Vec<Incident>,
    filters: FilterConfig,
    sort: SortConfig,
    pending_notice: Option<String>,
    outstanding: Option<LoadTicket>,
    next_ticket: u64,
    torn_down: bool,
    fetch_limit: u32,
}

impl Default for IncidentViewModel {
    fn default() -> Self {
        Self::new()
    }
}

impl IncidentViewModel {
    pub fn new() -> Self {
        Self::with_fetch_limit(DEFAULT_FETCH_LIMIT)
    }

    pub fn with_fetch_limit(fetch_limit: u32) -> Self {
        Self {
            state: LoadState::Loading,
            incidents: Vec::new(),
            filters: FilterConfig::default(),
            sort: SortConfig::default(),
            pending_notice: None,
            outstanding: None,
            next_ticket: 0,
            torn_down: false,
            fetch_limit,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn fetch_limit(&self) -> u32 {
        self.fetch_limit
    }

    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    pub fn filters(&self) -> &FilterConfig {
        &self.filters
    }

    pub fn sort(&self) -> SortConfig {
        self.sort
    }

    pub fn is_loading(&self) -> bool {
        self.outstanding.is_some()
    }

    /// Reserve the single load slot. `None` while another load is outstanding or after teardown.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if self.torn_down || self.outstanding.is_some() {
            debug!(torn_down = self.torn_down, "load not started");
            return None;
        }
        let ticket = LoadTicket(self.next_ticket);
        self.next_ticket += 1;
        self.outstanding = Some(ticket);
        Some(ticket)
    }

    /// Apply the outcome of the load identified by `ticket`.
    ///
    /// Returns `false` (and changes nothing) when the ticket is stale or the view model has
    /// been torn down.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Incident>, AppError>,
    ) -> bool {
        if self.torn_down || self.outstanding != Some(ticket) {
            debug!(?ticket, "discarding load result");
            return false;
        }
        self.outstanding = None;

        match result {
            Ok(incidents) if !incidents.is_empty() => {
                info!(count = incidents.len(), "incidents loaded");
                self.incidents = incidents;
                self.state = LoadState::Live;
            }
            Ok(_) => self.enter_fallback(FallbackReason::EmptyResult),
            Err(err) => {
                warn!(code = %err.code, reason = %err.message, "incident fetch failed");
                let reason = if err.kind() == Some(FetchFailureKind::Empty) {
                    FallbackReason::EmptyResult
                } else {
                    FallbackReason::FetchFailed
                };
                self.enter_fallback(reason);
            }
        }
        true
    }

    /// Run one complete load against `source` on the calling thread.
    pub fn load<S: IncidentSource + ?Sized>(&mut self, source: &S) -> LoadState {
        let Some(ticket) = self.begin_load() else {
            return self.state;
        };
        let result = source.fetch_incidents(self.fetch_limit);
        self.complete_load(ticket, result);
        self.state
    }

    /// Detach the view model: any outstanding load result will be discarded.
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.outstanding = None;
    }

    fn enter_fallback(&mut self, reason: FallbackReason) {
        self.incidents = match fallback_incidents() {
            Ok(incidents) => incidents,
            Err(err) => {
                error!(code = %err.code, details = ?err.details, "fallback data unavailable");
                Vec::new()
            }
        };
        self.state = LoadState::Fallback(reason);
        self.pending_notice = Some(FALLBACK_NOTICE.to_string());
        info!(?reason, count = self.incidents.len(), "using fallback incidents");
    }

    pub fn pending_notice(&self) -> Option<&str> {
        self.pending_notice.as_deref()
    }

    /// Hand the pending notice to the presentation layer and clear it.
    pub fn take_notice(&mut self) -> Option<String> {
        self.pending_notice.take()
    }

    pub fn dispatch(&mut self, action: FilterAction) {
        self.filters = std::mem::take(&mut self.filters).apply(action);
    }

    pub fn dispatch_sort(&mut self, action: SortAction) {
        self.sort = self.sort.apply(action);
    }

    pub fn derived(&self) -> Vec<&Incident> {
        derive_incidents(&self.incidents, &self.filters, self.sort)
    }

    pub fn rows(&self) -> Vec<IncidentRow> {
        self.derived()
            .into_iter()
            .map(IncidentRow::from_incident)
            .collect()
    }

    /// Status counts over the full loaded list, independent of active filters.
    pub fn summary(&self) -> StatusBreakdown {
        StatusBreakdown::from_incidents(&self.incidents)
    }
}
