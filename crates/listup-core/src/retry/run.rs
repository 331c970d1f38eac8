//! Retry loop: run an update cycle until it stops failing or the policy says stop.

use super::classify;
use super::policy::{RetryDecision, RetryPolicy};
use crate::pipeline::Decision;

/// Runs `f` until it returns a non-failed decision or the retry policy says to stop.
/// On retryable failure, sleeps for the backoff duration then tries again.
pub fn run_with_retry<F>(policy: &RetryPolicy, mut f: F) -> Decision
where
    F: FnMut() -> Decision,
{
    let mut attempt = 1u32;
    loop {
        let decision = f();
        let Decision::Failed(e) = &decision else {
            return decision;
        };
        match policy.decide(attempt, classify::classify(e)) {
            RetryDecision::NoRetry => return decision,
            RetryDecision::RetryAfter(d) => {
                tracing::warn!(attempt, delay_ms = d.as_millis() as u64, "retrying: {}", e);
                std::thread::sleep(d);
                attempt += 1;
            }
        }
    }
}
