use incidash_core::error::AppError;

/// Raw incident page, relayed byte-for-byte by the proxy.
///
/// Implementations only guarantee the text is well-formed JSON.
pub trait IncidentFeed: Send + Sync {
    fn fetch_raw(&self, limit: u32) -> Result<String, AppError>;
}
