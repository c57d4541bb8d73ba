//! Trek back office: site API server.
//!
//! ```text
//!   Browser ──GET /api/settings──▶ http (axum)
//!                                    │
//!                                    ▼
//!                              settings service ──▶ settings cache (in-process)
//!                                    │ miss
//!                                    ▼
//!                              retry_with_backoff ──▶ hosted backend REST API
//! ```
//!
//! Usage: `trek-backoffice [CONFIG.toml]`

use std::path::PathBuf;

use tokio::net::TcpListener;

use trek_backoffice::config::load_or_default;
use trek_backoffice::http::SiteServer;
use trek_backoffice::lifecycle::{wait_for_signal, Shutdown};
use trek_backoffice::observability::{logging, metrics};
use trek_backoffice::settings::{MemoryStore, SettingsService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = load_or_default(config_path.as_deref())?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("trek-backoffice v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        backend = %config.backend.url,
        bind_address = %config.server.bind_address,
        max_retries = config.retry.max_retries,
        cache_ttl_secs = config.settings_cache.ttl_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let settings = SettingsService::from_config(&config, MemoryStore::new())?;
    let listener = TcpListener::bind(&config.server.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    SiteServer::new(&config, settings).run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
