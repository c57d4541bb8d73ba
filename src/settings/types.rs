//! Branding settings types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fallback logo served when the backend cannot be reached.
pub const DEFAULT_LOGO_URL: &str = "/images/logo.svg";

/// Branding row of the hosted `site_settings` table.
///
/// Only the logo and favicon are interpreted here; every other column is
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandingSettings {
    pub logo_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon_url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for BrandingSettings {
    fn default() -> Self {
        Self {
            logo_url: DEFAULT_LOGO_URL.to_string(),
            favicon_url: None,
            extra: Map::new(),
        }
    }
}

/// Persisted layout of the single cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedSettings {
    pub data: BrandingSettings,
    /// Capture instant, milliseconds since the Unix epoch.
    pub timestamp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_columns_survive() {
        let raw = r##"{"logo_url":"https://cdn.example/logo.png","site_name":"Summit Treks","primary_color":"#2f5d50"}"##;
        let settings: BrandingSettings = serde_json::from_str(raw).unwrap();

        assert_eq!(settings.logo_url, "https://cdn.example/logo.png");
        assert_eq!(settings.favicon_url, None);
        assert_eq!(settings.extra["site_name"], "Summit Treks");

        let back: Value = serde_json::to_value(&settings).unwrap();
        assert_eq!(back["primary_color"], "#2f5d50");
        assert!(back.get("favicon_url").is_none());
    }

    #[test]
    fn test_cache_entry_layout() {
        let entry = CachedSettings {
            data: BrandingSettings {
                favicon_url: Some("/favicon.ico".to_string()),
                ..BrandingSettings::default()
            },
            timestamp: 1_700_000_000_000,
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["timestamp"], 1_700_000_000_000u64);
        assert_eq!(value["data"]["logo_url"], DEFAULT_LOGO_URL);
        assert_eq!(value["data"]["favicon_url"], "/favicon.ico");
    }
}
