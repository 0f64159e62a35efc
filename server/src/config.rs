use std::net::SocketAddr;
use std::time::Duration;

use axum::http::HeaderValue;
use incidash_core::error::AppError;
use incidash_core::source::DEFAULT_FETCH_LIMIT;
use incidash_source::config::{validate_limit, SourceConfig, DEFAULT_SOURCE_URL};

pub const ENV_API_KEY: &str = "PAGERDUTY_API_KEY";
pub const ENV_SOURCE_URL: &str = "INCIDASH_SOURCE_URL";
pub const ENV_BIND: &str = "INCIDASH_BIND";
pub const ENV_CORS_ORIGIN: &str = "INCIDASH_CORS_ORIGIN";
pub const ENV_FETCH_LIMIT: &str = "INCIDASH_FETCH_LIMIT";
pub const ENV_TIMEOUT_SECS: &str = "INCIDASH_TIMEOUT_SECS";

pub const DEFAULT_BIND: &str = "127.0.0.1:5001";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Proxy settings resolved from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub cors_origin: HeaderValue,
    pub fetch_limit: u32,
    pub source: SourceConfig,
}

fn invalid(var: &str, raw: &str, err: impl std::fmt::Display) -> AppError {
    AppError::new("CONFIG_INVALID", format!("Invalid value for {var}"))
        .with_details(format!("value={raw}; err={err}"))
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, var: &str) -> Option<String> {
    lookup(var)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Page size from `INCIDASH_FETCH_LIMIT`, defaulting to 30.
pub fn fetch_limit_from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<u32, AppError> {
    match non_empty(lookup, ENV_FETCH_LIMIT) {
        None => Ok(DEFAULT_FETCH_LIMIT),
        Some(raw) => {
            let limit: u32 = raw.parse().map_err(|e| invalid(ENV_FETCH_LIMIT, &raw, e))?;
            validate_limit(limit).map_err(|e| {
                invalid(ENV_FETCH_LIMIT, &raw, e.details.unwrap_or(e.message))
            })
        }
    }
}

/// Incident-source connection settings. Requires `PAGERDUTY_API_KEY`.
pub fn source_config_from_lookup(
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<SourceConfig, AppError> {
    let api_key = non_empty(lookup, ENV_API_KEY).ok_or_else(|| {
        AppError::new("CONFIG_INVALID", format!("{ENV_API_KEY} is not set"))
    })?;
    let base_url =
        non_empty(lookup, ENV_SOURCE_URL).unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string());

    let timeout_secs = match non_empty(lookup, ENV_TIMEOUT_SECS) {
        None => DEFAULT_TIMEOUT_SECS,
        Some(raw) => match raw.parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            Ok(_) => return Err(invalid(ENV_TIMEOUT_SECS, &raw, "must be positive")),
            Err(e) => return Err(invalid(ENV_TIMEOUT_SECS, &raw, e)),
        },
    };

    Ok(SourceConfig::new(&base_url, &api_key)?.with_timeout(Duration::from_secs(timeout_secs)))
}

impl ServerConfig {
    /// Read the process environment. The binary loads `.env` into it once at startup.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let bind_raw = non_empty(&lookup, ENV_BIND).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr: SocketAddr = bind_raw
            .parse()
            .map_err(|e| invalid(ENV_BIND, &bind_raw, e))?;

        let origin_raw = non_empty(&lookup, ENV_CORS_ORIGIN)
            .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());
        let cors_origin = HeaderValue::from_str(origin_raw.trim_end_matches('/'))
            .map_err(|e| invalid(ENV_CORS_ORIGIN, &origin_raw, e))?;

        Ok(Self {
            bind_addr,
            cors_origin,
            fetch_limit: fetch_limit_from_lookup(&lookup)?,
            source: source_config_from_lookup(&lookup)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let cfg = ServerConfig::from_lookup(lookup(&[(ENV_API_KEY, "k")])).unwrap();
        assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:5001");
        assert_eq!(cfg.cors_origin, "http://localhost:3000");
        assert_eq!(cfg.fetch_limit, 30);
        assert_eq!(cfg.source.base_url(), "https://api.pagerduty.com");
        assert_eq!(cfg.source.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let err = ServerConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err.code, "CONFIG_INVALID");
        assert!(err.message.contains(ENV_API_KEY));
    }

    #[test]
    fn overrides_are_validated() {
        let cfg = ServerConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "k"),
            (ENV_BIND, "0.0.0.0:8080"),
            (ENV_CORS_ORIGIN, "https://dash.example.com/"),
            (ENV_FETCH_LIMIT, "50"),
            (ENV_SOURCE_URL, "http://127.0.0.1:9999"),
            (ENV_TIMEOUT_SECS, "3"),
        ]))
        .unwrap();
        assert_eq!(cfg.bind_addr.port(), 8080);
        assert_eq!(cfg.cors_origin, "https://dash.example.com");
        assert_eq!(cfg.fetch_limit, 50);
        assert_eq!(cfg.source.base_url(), "http://127.0.0.1:9999");

        for (var, value) in [
            (ENV_BIND, "localhost"),
            (ENV_FETCH_LIMIT, "0"),
            (ENV_FETCH_LIMIT, "lots"),
            (ENV_TIMEOUT_SECS, "0"),
        ] {
            let err = ServerConfig::from_lookup(lookup(&[(ENV_API_KEY, "k"), (var, value)]))
                .unwrap_err();
            assert_eq!(err.code, "CONFIG_INVALID", "{var}={value}");
        }
    }

    #[test]
    fn config_debug_never_shows_the_key() {
        let cfg = ServerConfig::from_lookup(lookup(&[(ENV_API_KEY, "hunter2-secret")])).unwrap();
        assert!(!format!("{cfg:?}").contains("hunter2-secret"));
    }
}
