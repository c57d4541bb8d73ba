//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the site API handlers
//! - Wire up middleware (tracing, timeout, request ID, CORS)
//! - Serve on a bound listener until shutdown is signalled

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ServerConfig, SiteConfig};
use crate::http::handlers::{get_settings, health};
use crate::settings::{MemoryStore, RestSettingsSource, SettingsService};

/// Settings service as wired into the server: REST source, in-process store.
pub type SiteSettings = SettingsService<RestSettingsSource, MemoryStore>;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<SiteSettings>,
}

/// HTTP server for the marketing site API.
pub struct SiteServer {
    router: Router,
    config: ServerConfig,
}

impl SiteServer {
    /// Create a new server around an existing settings service.
    pub fn new(config: &SiteConfig, settings: SiteSettings) -> Self {
        let deadline = settings_deadline(config.server.request_timeout_secs);
        let state = AppState {
            settings: Arc::new(settings.with_deadline(deadline)),
        };

        Self {
            router: Self::build_router(&config.server, state),
            config: config.server.clone(),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .route("/api/settings", get(get_settings))
            .route("/health", get(health))
            .with_state(state)
            .layer(cors_layer(&config.allowed_origins))
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Serve until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            timeout_secs = self.config.request_timeout_secs,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the server config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Headroom left between the settings lookup and the request timeout, so the
/// handler answers with defaults before the timeout layer answers 408.
const DEADLINE_MARGIN: Duration = Duration::from_millis(500);
const MIN_DEADLINE: Duration = Duration::from_millis(100);

fn settings_deadline(request_timeout_secs: u64) -> Duration {
    Duration::from_secs(request_timeout_secs)
        .saturating_sub(DEADLINE_MARGIN)
        .max(MIN_DEADLINE)
}

/// Read-only CORS for the front end. No configured origins means any origin.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .max_age(Duration::from_secs(60 * 60));

    if allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}
