use serde::{Deserialize, Serialize};

use crate::domain::{Incident, IncidentStatus};

/// Per-status counts over the full loaded incident list (never the filtered view).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusBreakdown {
    pub triggered: usize,
    pub acknowledged: usize,
    pub resolved: usize,
}

/// One chart segment, in fixed Triggered/Acknowledged/Resolved order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusSlice {
    pub status: IncidentStatus,
    pub count: usize,
    pub color: String,
}

pub fn status_color(status: IncidentStatus) -> &'static str {
    match status {
        IncidentStatus::Triggered => "#d32f2f",
        IncidentStatus::Acknowledged => "#FFBF00",
        IncidentStatus::Resolved => "#388e3c",
    }
}

impl StatusBreakdown {
    pub fn from_incidents(incidents: &[Incident]) -> Self {
        incidents.iter().fold(Self::default(), |mut acc, inc| {
            match inc.status {
                IncidentStatus::Triggered => acc.triggered += 1,
                IncidentStatus::Acknowledged => acc.acknowledged += 1,
                IncidentStatus::Resolved => acc.resolved += 1,
            }
            acc
        })
    }

    pub fn count(&self, status: IncidentStatus) -> usize {
        match status {
            IncidentStatus::Triggered => self.triggered,
            IncidentStatus::Acknowledged => self.acknowledged,
            IncidentStatus::Resolved => self.resolved,
        }
    }

    pub fn open_incidents(&self) -> usize {
        self.triggered + self.acknowledged
    }

    pub fn total(&self) -> usize {
        self.open_incidents() + self.resolved
    }

    pub fn slices(&self) -> Vec<StatusSlice> {
        IncidentStatus::ALL
            .into_iter()
            .map(|status| StatusSlice {
                status,
                count: self.count(status),
                color: status_color(status).to_string(),
            })
            .collect()
    }
}
