use std::sync::Arc;

use std::future::Future;
use std::io;

use anyhow::Context;
use incidash_source::pagerduty::PagerDutyClient;
use tracing::{error, info};

pub mod config;
pub mod dashboard;
pub mod routes;
pub mod view;

use config::ServerConfig;
use routes::{build_router, AppState};

/// Bind the proxy listener and serve until the process is stopped.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    info!(
        bind = %config.bind_addr,
        source = %config.source.base_url(),
        limit = config.fetch_limit,
        "starting incident proxy"
    );

    let state = AppState {
        feed: Arc::new(PagerDutyClient::new(config.source.clone())),
        fetch_limit: config.fetch_limit,
    };
    let app = build_router(state, config.cors_origin.clone());

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("Server is running on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            wait_for_interrupt(tokio::signal::ctrl_c()).await;
            info!("shutdown requested");
        })
        .await
        .context("server error")
}

/// Resolve once `signal` fires. If the handler could not be installed, log it and never
/// resolve, so a missing handler is not mistaken for an interrupt.
pub async fn wait_for_interrupt<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(err) = signal.await {
        error!(%err, "failed to install interrupt handler");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn interrupt_resolves_when_the_signal_fires() {
        let waited = tokio::time::timeout(
            Duration::from_millis(200),
            wait_for_interrupt(async { Ok(()) }),
        )
        .await;
        assert!(waited.is_ok());
    }

    #[tokio::test]
    async fn failed_handler_install_never_counts_as_interrupt() {
        let waited = tokio::time::timeout(
            Duration::from_millis(50),
            wait_for_interrupt(async { Err(io::Error::other("signal driver unavailable")) }),
        )
        .await;
        assert!(waited.is_err());
    }
}
