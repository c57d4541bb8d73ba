//! Branding settings subsystem.
//!
//! # Data Flow
//! ```text
//! service.rs (branding request)
//!     → cache.rs (fresh entry in the session store? return it)
//!     → source.rs (REST fetch, wrapped in resilience::retry_with_backoff)
//!     → cache.rs (overwrite entry with payload + timestamp)
//!     → caller (degrades to BrandingSettings::default on error)
//! ```
//!
//! # Design Decisions
//! - The store is an explicit handle, never global state
//! - One key, one entry, one TTL; no eviction beyond expiry
//! - Corrupt entries are purged and treated as a miss

pub mod cache;
pub mod service;
pub mod source;
pub mod store;
pub mod types;

pub use cache::{SettingsCache, SETTINGS_CACHE_KEY};
pub use service::SettingsService;
pub use source::{FetchError, RestSettingsSource, SettingsSource};
pub use store::{FileStore, MemoryStore, SessionStore, StoreError};
pub use types::BrandingSettings;
