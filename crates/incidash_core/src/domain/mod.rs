use std::fmt;
use std::str::FromStr;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

/// Lifecycle status reported by the incident source.
///
/// The live API spells statuses in lowercase while the bundled data set uses title case;
/// both decode to the same variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IncidentStatus {
    #[serde(alias = "triggered")]
    Triggered,
    #[serde(alias = "acknowledged")]
    Acknowledged,
    #[serde(alias = "resolved")]
    Resolved,
}

impl IncidentStatus {
    pub const ALL: [IncidentStatus; 3] = [
        IncidentStatus::Triggered,
        IncidentStatus::Acknowledged,
        IncidentStatus::Resolved,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IncidentStatus::Triggered => "Triggered",
            IncidentStatus::Acknowledged => "Acknowledged",
            IncidentStatus::Resolved => "Resolved",
        }
    }

    /// Triggered and Acknowledged incidents count as open.
    pub fn is_open(self) -> bool {
        !matches!(self, IncidentStatus::Resolved)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    High,
    Low,
}

impl Urgency {
    pub const ALL: [Urgency; 2] = [Urgency::High, Urgency::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Urgency::High => "high",
            Urgency::Low => "low",
        }
    }
}

/// Priority levels offered as filter choices.
///
/// Incidents carry the priority as a free-form `summary` string, so matching is done on
/// [`Priority::as_str`] rather than by decoding incidents into this enum.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    P1,
    P2,
    P3,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::P1, Priority::P2, Priority::P3];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::P1 => "P1",
            Priority::P2 => "P2",
            Priority::P3 => "P3",
        }
    }
}

fn invalid_value(field: &str, raw: &str) -> AppError {
    AppError::new("FILTER_VALUE_INVALID", format!("Unknown {field} value"))
        .with_details(format!("value={raw}"))
}

impl FromStr for IncidentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IncidentStatus::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| invalid_value("status", s))
    }
}

impl FromStr for Urgency {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Urgency::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| invalid_value("urgency", s))
    }
}

impl FromStr for Priority {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| invalid_value("priority", s))
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority reference as embedded in an incident. Only `summary` is consumed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriorityRef {
    #[serde(default, deserialize_with = "string_or_none")]
    pub summary: Option<String>,
}

/// Incident record as delivered by the incident source. Never mutated after load.
///
/// Notes:
/// - `priority` may be absent or `null`; priority filters treat that as non-matching.
/// - `created_at` is kept as the raw source string. Parsing happens at derive/render time so
///   a malformed value degrades only the fields that depend on it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Incident {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub status: IncidentStatus,
    #[serde(default, deserialize_with = "priority_or_none")]
    pub priority: Option<PriorityRef>,
    pub urgency: Urgency,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_none")]
    pub created_at: Option<String>,
}

// Optional incident fields degrade to "absent" when the source sends `null` or the wrong
// type, so one malformed field never discards the incident or the page.
#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Value(T),
    Other(IgnoredAny),
}

impl<T> Lenient<T> {
    fn into_option(self) -> Option<T> {
        match self {
            Lenient::Value(v) => Some(v),
            Lenient::Other(_) => None,
        }
    }
}

fn string_or_none<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Lenient::<String>::deserialize(d)?.into_option())
}

fn string_or_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(string_or_none(d)?.unwrap_or_default())
}

fn priority_or_none<'de, D: Deserializer<'de>>(d: D) -> Result<Option<PriorityRef>, D::Error> {
    Ok(Lenient::<PriorityRef>::deserialize(d)?.into_option())
}

impl Incident {
    pub fn priority_summary(&self) -> Option<&str> {
        self.priority.as_ref().and_then(|p| p.summary.as_deref())
    }
}

/// Response envelope of the incident source: `{ "incidents": [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncidentList {
    pub incidents: Vec<Incident>,
}
