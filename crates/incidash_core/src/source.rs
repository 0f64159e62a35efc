use crate::domain::Incident;
use crate::error::AppError;

/// Page size requested from the incident source.
pub const DEFAULT_FETCH_LIMIT: u32 = 30;

/// Outbound incident fetch used by the view model.
///
/// Contract: a single attempt, no retry. A successful call returns at least one incident;
/// an empty result is reported as an error with code `SOURCE_EMPTY`.
pub trait IncidentSource {
    fn fetch_incidents(&self, limit: u32) -> Result<Vec<Incident>, AppError>;
}

impl<S: IncidentSource + ?Sized> IncidentSource for Box<S> {
    fn fetch_incidents(&self, limit: u32) -> Result<Vec<Incident>, AppError> {
        (**self).fetch_incidents(limit)
    }
}
