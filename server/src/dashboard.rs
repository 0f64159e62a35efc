use comfy_table::{Cell, CellAlignment, Color, Table};
use incidash_core::domain::{IncidentStatus, Priority, Urgency};
use incidash_core::filter::actions::{DateRangePreset, FilterAction, SortAction};
use incidash_core::filter::SortDirection;
use incidash_core::summary::StatusBreakdown;
use incidash_core::view_model::{IncidentRow, IncidentViewModel, StatusTone};
use time::OffsetDateTime;

pub const NO_DATA: &str = "No Data Found";
const COLUMNS: [&str; 5] = ["Status", "Priority", "Urgency", "Title", "Created"];

/// Filter and sort selections taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    pub statuses: Vec<IncidentStatus>,
    pub priorities: Vec<Priority>,
    pub urgencies: Vec<Urgency>,
    pub title: Option<String>,
    pub last_days: Option<DateRangePreset>,
    pub sort: SortDirection,
}

/// Replay `options` onto the view model as reducer actions.
pub fn apply_options(vm: &mut IncidentViewModel, options: &ViewOptions, now: OffsetDateTime) {
    // Toggles only add: a value repeated on the command line stays selected.
    for status in &options.statuses {
        if !vm.filters().status.contains(status) {
            vm.dispatch(FilterAction::ToggleStatus(*status));
        }
    }
    for priority in &options.priorities {
        if !vm.filters().priority.contains(priority) {
            vm.dispatch(FilterAction::TogglePriority(*priority));
        }
    }
    for urgency in &options.urgencies {
        if !vm.filters().urgency.contains(urgency) {
            vm.dispatch(FilterAction::ToggleUrgency(*urgency));
        }
    }
    if let Some(title) = &options.title {
        vm.dispatch(FilterAction::SetTitle(title.clone()));
    }
    if let Some(preset) = options.last_days {
        vm.dispatch(FilterAction::ApplyDatePreset { preset, now });
    }
    vm.dispatch_sort(SortAction::Set(options.sort));
}

fn tone_color(tone: StatusTone) -> Color {
    match tone {
        StatusTone::Open => Color::Red,
        StatusTone::Resolved => Color::Green,
    }
}

/// "Open Incidents: N" followed by one legend line per status.
pub fn render_summary(breakdown: &StatusBreakdown) -> String {
    let mut out = format!("Open Incidents: {}\n", breakdown.open_incidents());
    for slice in breakdown.slices() {
        out.push_str(&format!("{} {}\n", slice.count, slice.status));
    }
    out
}

pub fn render_table(rows: &[IncidentRow]) -> String {
    let mut table = Table::new();
    table.set_header(COLUMNS.iter().map(|c| Cell::new(c).fg(Color::Cyan)));

    if rows.is_empty() {
        table.add_row(vec![Cell::new(NO_DATA).set_alignment(CellAlignment::Center)]);
        return table.to_string();
    }

    for row in rows {
        table.add_row(vec![
            Cell::new(row.status.as_str()).fg(tone_color(row.tone)),
            Cell::new(&row.priority),
            Cell::new(&row.urgency),
            Cell::new(&row.title),
            Cell::new(&row.created),
        ]);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use incidash_core::domain::{Incident, PriorityRef};

    fn incident(status: IncidentStatus, title: &str, created_at: &str) -> Incident {
        Incident {
            id: None,
            status,
            priority: Some(PriorityRef {
                summary: Some("P2".to_string()),
            }),
            urgency: Urgency::Low,
            title: title.to_string(),
            created_at: Some(created_at.to_string()),
        }
    }

    #[test]
    fn summary_lists_open_total_and_legend() {
        let breakdown = StatusBreakdown {
            triggered: 2,
            acknowledged: 1,
            resolved: 4,
        };
        assert_eq!(
            render_summary(&breakdown),
            "Open Incidents: 3\n2 Triggered\n1 Acknowledged\n4 Resolved\n"
        );
    }

    #[test]
    fn empty_table_says_no_data() {
        let out = render_table(&[]);
        assert!(out.contains(NO_DATA));
        assert!(out.contains("Status"));
    }

    #[test]
    fn rows_render_formatted_dates() {
        let rows = vec![
            IncidentRow::from_incident(&incident(
                IncidentStatus::Resolved,
                "Disk full",
                "2024-01-05T15:07:00Z",
            )),
            IncidentRow::from_incident(&incident(IncidentStatus::Triggered, "Odd date", "soon")),
        ];
        let out = render_table(&rows);
        assert!(out.contains("Jan 5, 2024 at 3:07 PM"));
        assert!(out.contains("N/A"));
        assert!(out.contains("Odd date"));
    }

    #[test]
    fn options_become_filter_state() {
        let mut vm = IncidentViewModel::new();
        let now = OffsetDateTime::UNIX_EPOCH + time::Duration::days(100);
        let options = ViewOptions {
            statuses: vec![IncidentStatus::Resolved, IncidentStatus::Resolved],
            priorities: vec![Priority::P1],
            urgencies: vec![Urgency::High],
            title: Some("db".to_string()),
            last_days: Some(DateRangePreset::Last10Days),
            sort: SortDirection::Desc,
        };
        apply_options(&mut vm, &options, now);

        let filters = vm.filters();
        assert!(filters.status.contains(&IncidentStatus::Resolved));
        assert!(filters.priority.contains(&Priority::P1));
        assert!(filters.urgency.contains(&Urgency::High));
        assert_eq!(filters.title, "db");
        assert_eq!(
            filters.created,
            Some(OffsetDateTime::UNIX_EPOCH + time::Duration::days(90))
        );
        assert_eq!(vm.sort().direction, SortDirection::Desc);
    }
}
