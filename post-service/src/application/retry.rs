use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy)]
pub(crate) struct RetryPolicy {
    /// Total attempts, the first one included.
    pub(crate) max_attempts: u32,
    pub(crate) initial_delay: Duration,
    pub(crate) multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            multiplier: 2,
        }
    }
}

/// Runs `f` until it succeeds, retrying with exponential backoff only while it
/// fails with [`DomainError::LockTimeout`]. Any other error is returned at once.
pub(crate) async fn retry_on_lock_timeout<F, Fut, T>(
    policy: RetryPolicy,
    operation: &'static str,
    mut f: F,
) -> Result<T, DomainError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut delay = policy.initial_delay;
    let mut attempt = 1;

    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_lock_timeout() && attempt < max_attempts => {
                warn!(
                    operation,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "transaction hit lock timeout, retrying"
                );
                tokio::time::sleep(delay).await;
                delay = delay.saturating_mul(policy.multiplier);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
