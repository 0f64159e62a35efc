use incidash_core::error::AppError;
use incidash_core::source::IncidentSource;
use incidash_core::view_model::{IncidentViewModel, LoadState};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::dashboard::{apply_options, render_summary, render_table, ViewOptions};

/// Rendered terminal dashboard plus the notice to surface, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOutput {
    pub state: LoadState,
    pub notice: Option<String>,
    pub body: String,
}

/// Load once through `source`, apply `options`, and render summary and table.
///
/// The fetch runs on the blocking pool. If `cancel` resolves first the view model is torn
/// down, the late result is discarded, and `None` is returned.
pub async fn run_view<S, C>(
    source: S,
    options: &ViewOptions,
    fetch_limit: u32,
    cancel: C,
) -> Option<ViewOutput>
where
    S: IncidentSource + Send + 'static,
    C: std::future::Future<Output = ()>,
{
    let mut vm = IncidentViewModel::with_fetch_limit(fetch_limit);
    let ticket = vm.begin_load()?;
    let limit = vm.fetch_limit();
    let fetch = tokio::task::spawn_blocking(move || source.fetch_incidents(limit));

    tokio::select! {
        joined = fetch => {
            let result = joined.unwrap_or_else(|e| {
                Err(AppError::new("VIEW_FETCH_TASK_FAILED", "Incident fetch task failed")
                    .with_details(e.to_string()))
            });
            vm.complete_load(ticket, result);
        }
        _ = cancel => {
            warn!("view cancelled before incidents arrived");
            vm.teardown();
            return None;
        }
    }

    apply_options(&mut vm, options, OffsetDateTime::now_utc());
    let rows = vm.rows();
    info!(state = ?vm.state(), shown = rows.len(), loaded = vm.incidents().len(), "view rendered");

    let body = format!("{}\n{}\n", render_summary(&vm.summary()), render_table(&rows));
    Some(ViewOutput {
        state: vm.state(),
        notice: vm.take_notice(),
        body,
    })
}
