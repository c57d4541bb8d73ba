//! Back office services for a guided-trekking tour operator.
//!
//! The hosted backend owns persistence and auth; this crate owns the pieces
//! around it: retried backend calls, the branding settings cache, the site
//! API that serves it and admin credential generation.

pub mod config;
pub mod credentials;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod settings;

pub use config::schema::SiteConfig;
pub use http::SiteServer;
pub use lifecycle::Shutdown;
