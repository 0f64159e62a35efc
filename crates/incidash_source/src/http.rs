use incidash_core::domain::{Incident, IncidentList};
use incidash_core::error::{
    AppError, SOURCE_DECODE_FAILED, SOURCE_EMPTY, SOURCE_TRANSPORT_FAILED, SOURCE_UPSTREAM_FAILED,
};
use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::Value;

/// Send `request` and return its body text untouched, mapping every failure to a
/// `SOURCE_*` error.
///
/// Details carry the status code or transport message only; request headers are never
/// echoed.
pub(crate) fn call_text(request: ureq::Request, target: &str) -> Result<String, AppError> {
    match request.call() {
        Ok(r) if (200..300).contains(&r.status()) => r.into_string().map_err(|e| {
            AppError::new(SOURCE_DECODE_FAILED, "Failed to read incident response")
                .with_details(format!("target={target}; err={e}"))
        }),
        Ok(r) => Err(
            AppError::new(SOURCE_UPSTREAM_FAILED, "Incident source request failed")
                .with_details(format!("target={target}; status={}", r.status())),
        ),
        Err(ureq::Error::Status(status, _)) => Err(
            AppError::new(SOURCE_UPSTREAM_FAILED, "Incident source request failed")
                .with_details(format!("target={target}; status={status}"))
                .with_retryable(status >= 500),
        ),
        Err(ureq::Error::Transport(t)) => Err(
            AppError::new(SOURCE_TRANSPORT_FAILED, "Failed to reach incident source")
                .with_details(format!("target={target}; err={t}"))
                .with_retryable(true),
        ),
    }
}

fn decode_failure(target: &str, err: serde_json::Error) -> AppError {
    AppError::new(SOURCE_DECODE_FAILED, "Failed to decode incident response")
        .with_details(format!("target={target}; err={err}"))
}

/// Reject bodies that are not JSON without building a tree.
pub(crate) fn ensure_json(body: &str, target: &str) -> Result<(), AppError> {
    serde_json::from_str::<IgnoredAny>(body)
        .map(|_| ())
        .map_err(|e| decode_failure(target, e))
}

pub(crate) fn parse_json(body: &str, target: &str) -> Result<Value, AppError> {
    serde_json::from_str(body).map_err(|e| decode_failure(target, e))
}

/// Decode the `{ "incidents": [...] }` envelope, treating an empty list as a failure.
pub fn decode_incidents(body: &Value) -> Result<Vec<Incident>, AppError> {
    let list = IncidentList::deserialize(body).map_err(|e| {
        AppError::new(SOURCE_DECODE_FAILED, "Incident response has an unexpected shape")
            .with_details(e.to_string())
    })?;
    if list.incidents.is_empty() {
        return Err(AppError::new(SOURCE_EMPTY, "Incident source returned no incidents"));
    }
    Ok(list.incidents)
}
