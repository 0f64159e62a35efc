use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::{format_description, Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Display value for a creation date that cannot be parsed.
pub const DATE_UNAVAILABLE: &str = "N/A";

const DISPLAY_FORMAT: &str =
    "[month repr:short] [day padding:none], [year] at [hour repr:12 padding:none]:[minute] [period]";

fn parse_primitive_assume_utc(raw: &str, fmt: &str) -> Option<OffsetDateTime> {
    let items = format_description::parse(fmt).ok()?;
    let pdt = PrimitiveDateTime::parse(raw, &items).ok()?;
    Some(pdt.assume_utc())
}

fn parse_date_only(raw: &str) -> Option<OffsetDateTime> {
    let items = format_description::parse("[year]-[month]-[day]").ok()?;
    let date = Date::parse(raw, &items).ok()?;
    Some(date.midnight().assume_utc())
}

fn parse_allowlist(raw: &str) -> Option<OffsetDateTime> {
    // Deterministic allowlist only (no fuzzy parsing). Formats without a zone assume UTC.
    for fmt in [
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]",
        "[year]-[month]-[day]T[hour]:[minute]:[second]",
        "[year]-[month]-[day]T[hour]:[minute]",
        "[year]-[month]-[day] [hour]:[minute]:[second]",
        "[year]-[month]-[day] [hour]:[minute]",
    ] {
        if let Some(dt) = parse_primitive_assume_utc(raw, fmt) {
            return Some(dt);
        }
    }

    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc2822) {
        return Some(dt);
    }

    parse_date_only(raw)
}

/// Parse an incident timestamp.
///
/// RFC3339 is tried first, then a small allowlist of ISO-like and RFC2822 shapes.
/// Returns `None` for blank or unparseable input; callers degrade per field.
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Some(dt);
    }

    parse_allowlist(trimmed)
}

/// Render a creation timestamp as `MMM d, yyyy at h:mm AM` in UTC, or `N/A`.
pub fn format_created_at(raw: Option<&str>) -> String {
    let Some(dt) = raw.and_then(parse_timestamp) else {
        return DATE_UNAVAILABLE.to_string();
    };
    let Ok(items) = format_description::parse(DISPLAY_FORMAT) else {
        return DATE_UNAVAILABLE.to_string();
    };
    dt.to_offset(UtcOffset::UTC)
        .format(&items)
        .unwrap_or_else(|_| DATE_UNAVAILABLE.to_string())
}
