use crate::domain::Incident;
use crate::error::AppError;

const FALLBACK_JSON: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/fixtures/mock_incidents.json"
));

/// Bundled sample incidents shown when live data is unavailable.
///
/// Sanitized and deterministic: every status, priority and urgency appears at least once,
/// and one record has a `null` priority.
pub fn fallback_incidents() -> Result<Vec<Incident>, AppError> {
    serde_json::from_str(FALLBACK_JSON).map_err(|e| {
        AppError::new("FALLBACK_DATA_INVALID", "Bundled fallback incidents failed to decode")
            .with_details(e.to_string())
    })
}
