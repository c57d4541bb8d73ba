//! Configuration validation.
//!
//! Serde handles syntax; this checks values. Every problem is reported, not
//! just the first.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::SiteConfig;
use crate::credentials::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};

/// Upper bound on configured retries.
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("backend.url '{0}' is not a valid URL")]
    InvalidBackendUrl(String),

    #[error("backend.request_timeout_secs must be greater than zero")]
    ZeroBackendTimeout,

    #[error("retry.max_retries {0} exceeds limit of {limit}", limit = MAX_RETRIES_LIMIT)]
    TooManyRetries(u32),

    #[error("retry.base_delay_ms must be greater than zero")]
    ZeroBaseDelay,

    #[error("settings_cache.ttl_secs must be greater than zero")]
    ZeroTtl,

    #[error("server.request_timeout_secs must be greater than zero")]
    ZeroServerTimeout,

    #[error("{field} '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("credentials.password_length {0} outside {min}..={max}", min = MIN_PASSWORD_LENGTH, max = MAX_PASSWORD_LENGTH)]
    PasswordLength(usize),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &SiteConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if url::Url::parse(&config.backend.url).is_err() {
        errors.push(ValidationError::InvalidBackendUrl(config.backend.url.clone()));
    }

    if config.backend.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroBackendTimeout);
    }

    if config.retry.max_retries > MAX_RETRIES_LIMIT {
        errors.push(ValidationError::TooManyRetries(config.retry.max_retries));
    }

    if config.retry.base_delay_ms == 0 {
        errors.push(ValidationError::ZeroBaseDelay);
    }

    if config.settings_cache.ttl_secs == 0 {
        errors.push(ValidationError::ZeroTtl);
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroServerTimeout);
    }

    check_address(&mut errors, "server.bind_address", &config.server.bind_address);
    if config.observability.metrics_enabled {
        check_address(&mut errors, "observability.metrics_address", &config.observability.metrics_address);
    }

    let length = config.credentials.password_length;
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) {
        errors.push(ValidationError::PasswordLength(length));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
