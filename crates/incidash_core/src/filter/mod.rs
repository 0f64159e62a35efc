use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::{Incident, IncidentStatus, Priority, Urgency};
use crate::error::AppError;
use crate::normalize::timestamps::parse_timestamp;

pub mod actions;

/// Active filter predicates. Empty sets and an empty title impose no constraint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterConfig {
    #[serde(default)]
    pub status: BTreeSet<IncidentStatus>,
    #[serde(default)]
    pub priority: BTreeSet<Priority>,
    #[serde(default)]
    pub urgency: BTreeSet<Urgency>,
    #[serde(default)]
    pub title: String,
    /// Exclusive lower bound on `created_at`.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(AppError::new("FILTER_VALUE_INVALID", "Unknown sort direction")
                .with_details(format!("value={other}"))),
        }
    }
}

/// Ordering applied to `created_at`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortConfig {
    pub direction: SortDirection,
}

impl FilterConfig {
    pub fn is_empty(&self) -> bool {
        self.status.is_empty()
            && self.priority.is_empty()
            && self.urgency.is_empty()
            && self.title.is_empty()
            && self.created.is_none()
    }

    /// AND across clauses, OR within each selection set.
    pub fn matches(&self, incident: &Incident) -> bool {
        if !self.status.is_empty() && !self.status.contains(&incident.status) {
            return false;
        }

        if !self.priority.is_empty() {
            let Some(summary) = incident.priority_summary() else {
                return false;
            };
            if !self.priority.iter().any(|p| p.as_str() == summary) {
                return false;
            }
        }

        if !self.urgency.is_empty() && !self.urgency.contains(&incident.urgency) {
            return false;
        }

        if !self.title.is_empty()
            && !incident
                .title
                .to_lowercase()
                .contains(&self.title.to_lowercase())
        {
            return false;
        }

        if let Some(bound) = self.created {
            // Unparseable creation dates never satisfy a date bound.
            let created = incident.created_at.as_deref().and_then(parse_timestamp);
            if !created.is_some_and(|ts| ts > bound) {
                return false;
            }
        }

        true
    }
}

fn compare_created(
    a: Option<OffsetDateTime>,
    b: Option<OffsetDateTime>,
    direction: SortDirection,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match direction {
            SortDirection::Asc => a.cmp(&b),
            SortDirection::Desc => b.cmp(&a),
        },
        // Unparseable timestamps sink to the end in both directions.
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Derive the displayed sequence: filter, then stable-sort by `created_at`.
///
/// Pure over its inputs. The returned references borrow from `incidents` and keep their
/// original relative order among equal keys.
pub fn derive_incidents<'a>(
    incidents: &'a [Incident],
    filters: &FilterConfig,
    sort: SortConfig,
) -> Vec<&'a Incident> {
    let mut keyed: Vec<(Option<OffsetDateTime>, &'a Incident)> = incidents
        .iter()
        .filter(|incident| filters.matches(incident))
        .map(|incident| {
            let created = incident.created_at.as_deref().and_then(parse_timestamp);
            (created, incident)
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| compare_created(*a, *b, sort.direction));
    keyed.into_iter().map(|(_, incident)| incident).collect()
}
