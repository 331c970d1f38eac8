//! Retry and backoff policy for failed update cycles.
//!
//! Failures are classified as transient (storage hiccups) or permanent
//! (integrity and compile errors, which repeat for the same staged bytes);
//! only transient ones are retried, with exponential backoff.

mod classify;
mod policy;
mod run;

pub use classify::classify;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
