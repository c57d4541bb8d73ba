//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from the TOML config file.

use serde::{Deserialize, Serialize};

/// Root configuration for the back office.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// Hosted backend connection.
    pub backend: BackendConfig,

    /// Retry configuration for backend calls.
    pub retry: RetryConfig,

    /// Branding settings cache.
    pub settings_cache: SettingsCacheConfig,

    /// Site API server.
    pub server: ServerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Admin credential generation.
    pub credentials: CredentialsConfig,
}

/// Hosted backend (REST) connection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Project base URL (e.g., "https://abc.supabase.co").
    pub url: String,

    /// Public anon key sent as `apikey` and bearer token.
    pub anon_key: String,

    /// Table holding the branding row.
    pub settings_table: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:54321".to_string(),
            anon_key: String::new(),
            settings_table: "site_settings".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
        }
    }
}

/// Branding settings cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SettingsCacheConfig {
    /// Entry lifetime in seconds.
    pub ttl_secs: u64,

    /// Directory for the file-backed store used by the CLI.
    pub dir: String,
}

impl Default for SettingsCacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 60 * 60,
            dir: ".trek-cache".to_string(),
        }
    }
}

/// Site API server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Origins allowed by CORS. Empty allows any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
            allowed_origins: Vec::new(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin credential generation defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Generated password length.
    pub password_length: usize,

    /// Domain for batch-generated admin addresses.
    pub email_domain: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            password_length: 20,
            email_domain: "example.com".to_string(),
        }
    }
}
