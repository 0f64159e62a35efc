use serde::{Deserialize, Serialize};

use crate::domain::{Incident, IncidentStatus};
use crate::normalize::timestamps::format_created_at;

/// Colour class of the status cell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StatusTone {
    Open,
    Resolved,
}

/// Display-ready projection of one incident. Each field degrades on its own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncidentRow {
    pub status: IncidentStatus,
    pub tone: StatusTone,
    /// Blank when the incident has no priority.
    pub priority: String,
    pub urgency: String,
    pub title: String,
    /// Formatted creation date, or `N/A`.
    pub created: String,
}

impl IncidentRow {
    pub fn from_incident(incident: &Incident) -> Self {
        let tone = if incident.status.is_open() {
            StatusTone::Open
        } else {
            StatusTone::Resolved
        };
        Self {
            status: incident.status,
            tone,
            priority: incident.priority_summary().unwrap_or_default().to_string(),
            urgency: incident.urgency.as_str().to_string(),
            title: incident.title.clone(),
            created: format_created_at(incident.created_at.as_deref()),
        }
    }
}
