use std::time::Instant;

use axum::{extract::State, Json};

use crate::http::server::AppState;
use crate::observability::metrics;
use crate::settings::BrandingSettings;

/// Branding for the page shell. Falls back to defaults, never errors.
pub async fn get_settings(State(state): State<AppState>) -> Json<BrandingSettings> {
    let start = Instant::now();
    let settings = state.settings.branding_or_default().await;
    metrics::record_request("/api/settings", 200, start);
    Json(settings)
}

pub async fn health() -> &'static str {
    "ok"
}
