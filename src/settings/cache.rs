//! Time-bounded cache for the branding settings.
//!
//! Exactly one entry lives under [`SETTINGS_CACHE_KEY`]. It is served while
//! younger than the TTL, replaced on every successful refetch and purged
//! when it no longer parses. Expired data is never served as a fallback.

use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::observability::metrics::{self, CacheOutcome};
use crate::settings::store::{SessionStore, StoreError};
use crate::settings::types::{BrandingSettings, CachedSettings};

/// Store key of the cached branding entry.
pub const SETTINGS_CACHE_KEY: &str = "site_settings";

/// One hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Single-entry settings cache over an injected store.
#[derive(Debug, Clone)]
pub struct SettingsCache<S> {
    store: S,
    ttl: Duration,
}

impl<S: SessionStore> SettingsCache<S> {
    pub fn new(store: S) -> Self {
        Self { store, ttl: DEFAULT_TTL }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fresh cached settings, if any.
    pub fn read(&self) -> Option<BrandingSettings> {
        self.read_at(now_millis())
    }

    fn read_at(&self, now: u64) -> Option<BrandingSettings> {
        let raw = match self.store.get(SETTINGS_CACHE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                metrics::record_cache_lookup(CacheOutcome::Miss);
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, key = SETTINGS_CACHE_KEY, "Settings cache unreadable");
                metrics::record_cache_lookup(CacheOutcome::Miss);
                return None;
            }
        };

        let entry: CachedSettings = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, key = SETTINGS_CACHE_KEY, "Corrupt settings cache entry, purging");
                metrics::record_cache_lookup(CacheOutcome::Corrupt);
                self.invalidate();
                return None;
            }
        };

        let age_ms = now.saturating_sub(entry.timestamp);
        if u128::from(age_ms) >= self.ttl.as_millis() {
            tracing::debug!(age_ms, "Settings cache entry expired");
            metrics::record_cache_lookup(CacheOutcome::Expired);
            return None;
        }

        metrics::record_cache_lookup(CacheOutcome::Hit);
        Some(entry.data)
    }

    /// Overwrite the entry with `data` stamped now.
    pub fn write(&self, data: &BrandingSettings) -> Result<(), StoreError> {
        let entry = CachedSettings {
            data: data.clone(),
            timestamp: now_millis(),
        };
        self.store.set(SETTINGS_CACHE_KEY, &serde_json::to_string(&entry)?)
    }

    /// Drop the entry. Failures are logged, not returned.
    pub fn invalidate(&self) {
        if let Err(e) = self.store.remove(SETTINGS_CACHE_KEY) {
            tracing::warn!(error = %e, key = SETTINGS_CACHE_KEY, "Failed to purge settings cache entry");
        }
    }

    /// Serve from cache, or run `fetch` and cache its result.
    ///
    /// A fetch error is returned as is. A failed cache write only logs; the
    /// fetched settings are still returned.
    pub async fn get_or_fetch<F, Fut, E>(&self, fetch: F) -> Result<BrandingSettings, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<BrandingSettings, E>>,
    {
        if let Some(cached) = self.read() {
            tracing::debug!("Serving branding settings from cache");
            return Ok(cached);
        }

        let fresh = fetch().await?;
        if let Err(e) = self.write(&fresh) {
            tracing::warn!(error = %e, "Failed to write settings cache");
        }
        Ok(fresh)
    }
}
