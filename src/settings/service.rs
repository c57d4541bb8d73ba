//! Branding settings lookup: cache first, then a retried backend fetch.

use crate::config::SiteConfig;
use crate::observability::metrics;
use crate::resilience::{retry_with_backoff, RetryPolicy};
use crate::settings::cache::SettingsCache;
use crate::settings::source::{FetchError, RestSettingsSource, SettingsSource};
use crate::settings::store::SessionStore;
use crate::settings::types::BrandingSettings;

use std::time::Duration;

#[derive(Debug)]
pub struct SettingsService<Src, S> {
    source: Src,
    cache: SettingsCache<S>,
    policy: RetryPolicy,
    deadline: Option<Duration>,
}

impl<S: SessionStore> SettingsService<RestSettingsSource, S> {
    /// REST source, retry policy and TTL taken from `config`.
    pub fn from_config(config: &SiteConfig, store: S) -> Result<Self, FetchError> {
        let source = RestSettingsSource::new(&config.backend)?;
        let cache = SettingsCache::new(store).with_ttl(Duration::from_secs(config.settings_cache.ttl_secs));

        Ok(Self::new(source, cache, RetryPolicy::from(&config.retry)))
    }
}

impl<Src: SettingsSource, S: SessionStore> SettingsService<Src, S> {
    pub fn new(source: Src, cache: SettingsCache<S>, policy: RetryPolicy) -> Self {
        Self {
            source,
            cache,
            policy,
            deadline: None,
        }
    }

    /// Bound [`Self::branding_or_default`] by `deadline`; when it elapses the
    /// defaults are served and the in-flight fetch is dropped.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn cache(&self) -> &SettingsCache<S> {
        &self.cache
    }

    /// Current branding settings.
    ///
    /// Errors surface once retries are exhausted; stale cache data is
    /// never substituted.
    pub async fn branding(&self) -> Result<BrandingSettings, FetchError> {
        let policy = &self.policy;
        let source = &self.source;

        self.cache
            .get_or_fetch(|| async move {
                let result = retry_with_backoff(policy, move || source.fetch_settings()).await;
                metrics::record_settings_fetch(result.is_ok());
                result
            })
            .await
    }

    /// Like [`Self::branding`], degrading to [`BrandingSettings::default`].
    pub async fn branding_or_default(&self) -> BrandingSettings {
        let result = match self.deadline {
            Some(deadline) => match tokio::time::timeout(deadline, self.branding()).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(
                        deadline_ms = deadline.as_millis() as u64,
                        "Branding lookup exceeded deadline, using defaults"
                    );
                    return BrandingSettings::default();
                }
            },
            None => self.branding().await,
        };

        match result {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(error = %e, "Branding settings unavailable, using defaults");
                BrandingSettings::default()
            }
        }
    }

    /// Drop the cached entry and fetch again.
    pub async fn refresh(&self) -> Result<BrandingSettings, FetchError> {
        self.cache.invalidate();
        self.branding().await
    }
}
