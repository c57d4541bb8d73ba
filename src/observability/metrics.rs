//! Metrics collection and exposition.
//!
//! # Metrics
//! - `trek_retries_total` (counter): retries scheduled, by status
//! - `trek_settings_cache_total` (counter): cache lookups, by outcome
//! - `trek_settings_fetch_total` (counter): backend fetches, by result
//! - `trek_http_requests_total` (counter): site API requests, by route and status
//! - `trek_http_request_duration_seconds` (histogram): site API latency
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use ::metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a scheduled retry.
pub fn record_retry(status: Option<u16>) {
    let status = status.map_or_else(|| "none".to_string(), |s| s.to_string());
    counter!("trek_retries_total", "status" => status).increment(1);
}

/// Outcome of a settings cache lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Hit,
    Miss,
    Expired,
    Corrupt,
}

impl CacheOutcome {
    fn as_str(self) -> &'static str {
        match self {
            CacheOutcome::Hit => "hit",
            CacheOutcome::Miss => "miss",
            CacheOutcome::Expired => "expired",
            CacheOutcome::Corrupt => "corrupt",
        }
    }
}

pub fn record_cache_lookup(outcome: CacheOutcome) {
    counter!("trek_settings_cache_total", "outcome" => outcome.as_str()).increment(1);
}

pub fn record_settings_fetch(success: bool) {
    let result = if success { "ok" } else { "error" };
    counter!("trek_settings_fetch_total", "result" => result).increment(1);
}

/// Record a served site API request.
pub fn record_request(route: &'static str, status: u16, start: Instant) {
    counter!("trek_http_requests_total", "route" => route, "status" => status.to_string()).increment(1);
    histogram!("trek_http_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}
