//! Branding settings fetched from the hosted backend's REST API.
//!
//! # Responsibilities
//! - Build the table endpoint from the project URL
//! - Authenticate with the public anon key
//! - Map non-2xx responses to errors that keep the status code
//!
//! The retry policy is applied by the caller, not here.

use std::future::Future;
use std::time::Duration;

use reqwest::header::ACCEPT;
use thiserror::Error;
use url::Url;

use crate::config::schema::BackendConfig;
use crate::resilience::HasStatus;
use crate::settings::types::BrandingSettings;

/// Errors from a single settings fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Http { status: u16, message: String },

    /// Connection, TLS or timeout failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Body was not a list of settings rows.
    #[error("invalid settings payload: {0}")]
    Decode(String),

    /// Table returned no rows.
    #[error("no settings row in table '{0}'")]
    NotFound(String),

    #[error("invalid backend URL: {0}")]
    InvalidUrl(String),
}

impl HasStatus for FetchError {
    fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            FetchError::Transport(e) => e.status().map(|s| s.as_u16()),
            FetchError::Decode(_) => None,
            FetchError::NotFound(_) => Some(404),
            // Misconfiguration never heals on its own.
            FetchError::InvalidUrl(_) => Some(400),
        }
    }
}

/// Anything that can produce the current branding settings.
pub trait SettingsSource: Send + Sync {
    fn fetch_settings(&self) -> impl Future<Output = Result<BrandingSettings, FetchError>> + Send;
}

/// PostgREST-style table reader.
#[derive(Debug, Clone)]
pub struct RestSettingsSource {
    client: reqwest::Client,
    endpoint: Url,
    anon_key: String,
    table: String,
}

impl RestSettingsSource {
    pub fn new(config: &BackendConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: settings_endpoint(&config.url, &config.settings_table)?,
            anon_key: config.anon_key.clone(),
            table: config.settings_table.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl SettingsSource for RestSettingsSource {
    async fn fetch_settings(&self) -> Result<BrandingSettings, FetchError> {
        let mut request = self
            .client
            .get(self.endpoint.clone())
            .header(ACCEPT, "application/json");
        if !self.anon_key.is_empty() {
            request = request
                .header("apikey", &self.anon_key)
                .bearer_auth(&self.anon_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        tracing::debug!(table = %self.table, bytes = body.len(), "Fetched settings row");
        parse_settings_rows(&body, &self.table)
    }
}

/// `{base}/rest/v1/{table}?select=*&limit=1`
pub fn settings_endpoint(base_url: &str, table: &str) -> Result<Url, FetchError> {
    let mut base = Url::parse(base_url).map_err(|e| FetchError::InvalidUrl(format!("{base_url}: {e}")))?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    let mut endpoint = base
        .join(&format!("rest/v1/{table}"))
        .map_err(|e| FetchError::InvalidUrl(format!("{base_url}: {e}")))?;
    endpoint
        .query_pairs_mut()
        .append_pair("select", "*")
        .append_pair("limit", "1");

    Ok(endpoint)
}

/// First row of a JSON array response.
pub fn parse_settings_rows(body: &str, table: &str) -> Result<BrandingSettings, FetchError> {
    let rows: Vec<BrandingSettings> =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    rows.into_iter()
        .next()
        .ok_or_else(|| FetchError::NotFound(table.to_string()))
}
