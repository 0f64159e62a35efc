use serde::{Deserialize, Serialize};
use std::fmt;

pub const SOURCE_TRANSPORT_FAILED: &str = "SOURCE_TRANSPORT_FAILED";
pub const SOURCE_UPSTREAM_FAILED: &str = "SOURCE_UPSTREAM_FAILED";
pub const SOURCE_DECODE_FAILED: &str = "SOURCE_DECODE_FAILED";
pub const SOURCE_EMPTY: &str = "SOURCE_EMPTY";
pub const SOURCE_CONFIG_INVALID: &str = "SOURCE_CONFIG_INVALID";

/// Single structured error shape shared by the core, the source adapters and the HTTP edge.
///
/// `details` is diagnostic text for server-side logs. It is never relayed to HTTP clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub retryable: bool,
}

/// Coarse classification of a failed incident fetch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FetchFailureKind {
    /// Network, DNS or timeout failure before a response arrived.
    Transport,
    /// The incident source answered with a non-2xx status (auth failures included).
    Upstream,
    /// A 2xx response whose body is not an incident envelope.
    Decode,
    /// A 2xx response carrying zero incidents.
    Empty,
    Config,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// Fetch classification for `SOURCE_*` codes; `None` for anything else.
    pub fn kind(&self) -> Option<FetchFailureKind> {
        match self.code.as_str() {
            SOURCE_TRANSPORT_FAILED => Some(FetchFailureKind::Transport),
            SOURCE_UPSTREAM_FAILED => Some(FetchFailureKind::Upstream),
            SOURCE_DECODE_FAILED => Some(FetchFailureKind::Decode),
            SOURCE_EMPTY => Some(FetchFailureKind::Empty),
            SOURCE_CONFIG_INVALID => Some(FetchFailureKind::Config),
            _ => None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}
