//! Leasedesk — a local-first intake service for PDF lease agreements.
//!
//! Documents are uploaded over a loopback HTTP API, run through a (mocked)
//! extraction backend, reviewed and corrected by the user, grouped into
//! datasets, and exported as CSV/XLSX. All state lives in one in-memory
//! store persisted as a JSON snapshot; the store is the only code allowed
//! to touch the document↔dataset membership relation.

pub mod api;
pub mod config;
pub mod export;
pub mod extract;
pub mod models;
pub mod pipeline;
pub mod state;
pub mod store;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::extract::MockExtractor;
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error("Invalid bind address: {0}")]
    Addr(#[from] std::net::AddrParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Initialize logging, open the persisted store, and serve the API until
/// Ctrl-C.
pub async fn run() -> Result<(), StartError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let state = Arc::new(AppState::open(
        config::snapshot_path(),
        Arc::new(MockExtractor::new()),
    ));

    let addr = config::bind_addr()?;
    let mut server = api::start_api_server(state, addr).await?;
    tracing::info!(addr = %server.addr, "Leasedesk ready");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    server.shutdown();

    Ok(())
}
