use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use super::{FilterConfig, SortConfig, SortDirection};
use crate::domain::{IncidentStatus, Priority, Urgency};

/// "Last N days" shortcuts offered on the created column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DateRangePreset {
    Last5Days,
    Last10Days,
    Last30Days,
}

impl DateRangePreset {
    pub const ALL: [DateRangePreset; 3] = [
        DateRangePreset::Last5Days,
        DateRangePreset::Last10Days,
        DateRangePreset::Last30Days,
    ];

    pub fn days(self) -> i64 {
        match self {
            DateRangePreset::Last5Days => 5,
            DateRangePreset::Last10Days => 10,
            DateRangePreset::Last30Days => 30,
        }
    }

    pub fn from_days(days: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.days() == days)
    }

    pub fn lower_bound(self, now: OffsetDateTime) -> OffsetDateTime {
        now - Duration::days(self.days())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    ToggleStatus(IncidentStatus),
    TogglePriority(Priority),
    ToggleUrgency(Urgency),
    SetTitle(String),
    ClearTitle,
    /// Replaces any prior `created` bound with `now - preset.days()`.
    ApplyDatePreset {
        preset: DateRangePreset,
        now: OffsetDateTime,
    },
    ClearCreated,
    ClearAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortAction {
    Toggle,
    Set(SortDirection),
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

impl FilterConfig {
    /// Reducer: returns the next configuration for `action`.
    pub fn apply(mut self, action: FilterAction) -> Self {
        match action {
            FilterAction::ToggleStatus(s) => toggle(&mut self.status, s),
            FilterAction::TogglePriority(p) => toggle(&mut self.priority, p),
            FilterAction::ToggleUrgency(u) => toggle(&mut self.urgency, u),
            FilterAction::SetTitle(title) => self.title = title,
            FilterAction::ClearTitle => self.title.clear(),
            FilterAction::ApplyDatePreset { preset, now } => {
                self.created = Some(preset.lower_bound(now));
            }
            FilterAction::ClearCreated => self.created = None,
            FilterAction::ClearAll => return FilterConfig::default(),
        }
        self
    }
}

impl SortConfig {
    pub fn apply(self, action: SortAction) -> Self {
        let direction = match action {
            SortAction::Toggle => self.direction.toggled(),
            SortAction::Set(direction) => direction,
        };
        SortConfig { direction }
    }
}
