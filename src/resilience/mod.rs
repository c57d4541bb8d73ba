//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to the hosted backend:
//!     → retries.rs (run, classify failure by status, decide)
//!     → backoff.rs (exponential delay + jitter for the next attempt)
//!     → success, or the original error once retries are spent
//! ```
//!
//! # Design Decisions
//! - Only transient failures (no status, 5xx) are retried
//! - Jittered backoff prevents synchronized retry storms
//! - Retry count is a hard ceiling; no timeout wraps the operation itself

pub mod backoff;
pub mod retries;

pub use retries::{retry_with_backoff, HasStatus, RetryDecision, RetryPolicy};
