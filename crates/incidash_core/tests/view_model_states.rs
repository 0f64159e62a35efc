use std::cell::Cell;

use pretty_assertions::assert_eq;

use incidash_core::domain::{Incident, IncidentStatus, PriorityRef, Urgency};
use incidash_core::error::{AppError, SOURCE_EMPTY, SOURCE_TRANSPORT_FAILED};
use incidash_core::fallback::fallback_incidents;
use incidash_core::filter::actions::{FilterAction, SortAction};
use incidash_core::filter::SortDirection;
use incidash_core::source::IncidentSource;
use incidash_core::view_model::{
    FallbackReason, IncidentViewModel, LoadState, FALLBACK_NOTICE,
};

struct StubSource {
    result: Result<Vec<Incident>, AppError>,
    calls: Cell<u32>,
    last_limit: Cell<u32>,
}

impl StubSource {
    fn new(result: Result<Vec<Incident>, AppError>) -> Self {
        Self {
            result,
            calls: Cell::new(0),
            last_limit: Cell::new(0),
        }
    }
}

impl IncidentSource for StubSource {
    fn fetch_incidents(&self, limit: u32) -> Result<Vec<Incident>, AppError> {
        self.calls.set(self.calls.get() + 1);
        self.last_limit.set(limit);
        self.result.clone()
    }
}

fn live_incidents() -> Vec<Incident> {
    vec![
        Incident {
            id: Some("L1".to_string()),
            status: IncidentStatus::Triggered,
            priority: Some(PriorityRef {
                summary: Some("P1".to_string()),
            }),
            urgency: Urgency::High,
            title: "Live one".to_string(),
            created_at: Some("2024-07-02T00:00:00Z".to_string()),
        },
        Incident {
            id: Some("L2".to_string()),
            status: IncidentStatus::Resolved,
            priority: None,
            urgency: Urgency::Low,
            title: "Live two".to_string(),
            created_at: Some("2024-07-01T00:00:00Z".to_string()),
        },
    ]
}

#[test]
fn starts_loading_and_empty() {
    let vm = IncidentViewModel::new();
    assert_eq!(vm.state(), LoadState::Loading);
    assert!(vm.incidents().is_empty());
    assert!(vm.rows().is_empty());
    assert_eq!(vm.fetch_limit(), 30);
}

#[test]
fn non_empty_success_goes_live() {
    let source = StubSource::new(Ok(live_incidents()));
    let mut vm = IncidentViewModel::new();
    assert_eq!(vm.load(&source), LoadState::Live);
    assert_eq!(source.calls.get(), 1);
    assert_eq!(source.last_limit.get(), 30);
    assert_eq!(vm.incidents(), live_incidents().as_slice());
    assert_eq!(vm.take_notice(), None);
}

#[test]
fn empty_success_falls_back_to_bundled_set() {
    let source = StubSource::new(Ok(Vec::new()));
    let mut vm = IncidentViewModel::new();
    assert_eq!(
        vm.load(&source),
        LoadState::Fallback(FallbackReason::EmptyResult)
    );
    assert_eq!(vm.incidents(), fallback_incidents().unwrap().as_slice());
}

#[test]
fn source_empty_error_is_an_empty_result() {
    let source = StubSource::new(Err(AppError::new(SOURCE_EMPTY, "no incidents")));
    let mut vm = IncidentViewModel::new();
    assert_eq!(
        vm.load(&source),
        LoadState::Fallback(FallbackReason::EmptyResult)
    );
}

#[test]
fn transport_failure_falls_back_with_single_notice() {
    let source = StubSource::new(Err(AppError::new(
        SOURCE_TRANSPORT_FAILED,
        "connection refused",
    )
    .with_retryable(true)));
    let mut vm = IncidentViewModel::new();
    assert_eq!(
        vm.load(&source),
        LoadState::Fallback(FallbackReason::FetchFailed)
    );
    assert_eq!(vm.incidents(), fallback_incidents().unwrap().as_slice());

    assert_eq!(vm.pending_notice(), Some(FALLBACK_NOTICE));
    assert_eq!(vm.take_notice().as_deref(), Some(FALLBACK_NOTICE));

    // Re-rendering and re-deriving never re-raise the notice.
    let _ = vm.rows();
    vm.dispatch(FilterAction::ToggleStatus(IncidentStatus::Resolved));
    let _ = vm.rows();
    assert_eq!(vm.take_notice(), None);
}

#[test]
fn filters_do_not_mutate_incidents_and_summary_ignores_them() {
    let source = StubSource::new(Ok(live_incidents()));
    let mut vm = IncidentViewModel::new();
    vm.load(&source);

    vm.dispatch(FilterAction::ToggleStatus(IncidentStatus::Resolved));
    vm.dispatch_sort(SortAction::Toggle);
    assert_eq!(vm.sort().direction, SortDirection::Desc);

    let rows = vm.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Live two");
    assert_eq!(vm.incidents(), live_incidents().as_slice());
    assert_eq!(vm.summary().open_incidents(), 1);
    assert_eq!(vm.summary().total(), 2);
}

#[test]
fn second_load_cannot_start_while_first_is_outstanding() {
    let mut vm = IncidentViewModel::new();
    let ticket = vm.begin_load().expect("first load");
    assert!(vm.is_loading());
    assert_eq!(vm.begin_load(), None);

    let source = StubSource::new(Ok(live_incidents()));
    assert_eq!(vm.load(&source), LoadState::Loading);
    assert_eq!(source.calls.get(), 0);

    assert!(vm.complete_load(ticket, Ok(live_incidents())));
    assert_eq!(vm.state(), LoadState::Live);
    assert!(vm.begin_load().is_some());
}

#[test]
fn refresh_after_live_can_fall_back() {
    let mut vm = IncidentViewModel::new();
    vm.load(&StubSource::new(Ok(live_incidents())));
    let failing = StubSource::new(Err(AppError::new(SOURCE_TRANSPORT_FAILED, "timeout")));
    assert_eq!(
        vm.load(&failing),
        LoadState::Fallback(FallbackReason::FetchFailed)
    );
    assert!(vm.take_notice().is_some());
}

#[test]
fn results_after_teardown_are_discarded() {
    let mut vm = IncidentViewModel::new();
    let ticket = vm.begin_load().expect("ticket");
    vm.teardown();

    assert!(!vm.complete_load(ticket, Ok(live_incidents())));
    assert_eq!(vm.state(), LoadState::Loading);
    assert!(vm.incidents().is_empty());
    assert_eq!(vm.begin_load(), None);

    let mut vm = IncidentViewModel::new();
    let ticket = vm.begin_load().expect("ticket");
    vm.teardown();
    assert!(!vm.complete_load(ticket, Err(AppError::new(SOURCE_TRANSPORT_FAILED, "x"))));
    assert_eq!(vm.pending_notice(), None);
}

#[test]
fn stale_ticket_is_ignored() {
    let mut vm = IncidentViewModel::new();
    let first = vm.begin_load().expect("first");
    assert!(vm.complete_load(first, Ok(live_incidents())));
    let _second = vm.begin_load().expect("second");
    assert!(!vm.complete_load(first, Ok(Vec::new())));
    assert_eq!(vm.state(), LoadState::Live);
}
