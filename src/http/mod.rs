//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! Browser request
//!     → server.rs (request ID, trace, timeout, CORS)
//!     → handlers.rs (settings lookup via SettingsService)
//!     → JSON response
//! ```

pub mod handlers;
pub mod server;

pub use server::{AppState, SiteServer, SiteSettings};
