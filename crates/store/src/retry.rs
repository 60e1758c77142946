//! Retry policy for session-store operations.
//!
//! Transient store errors (per [`GateError::is_retryable`]) are retried a
//! bounded number of times with linearly increasing backoff; a definitive
//! result, including "not found", short-circuits immediately. Exhausting
//! every attempt surfaces as [`GateError::StoreUnavailable`].

use calgate_types::{GateError, error::Result};
use std::future::Future;
use std::time::Duration;

/// A reusable retry policy: bounded attempts, linear backoff.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    /// Three retries at 100 ms, 200 ms, 300 ms.
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with `max_retries` retries after the initial attempt,
    /// backing off `base_delay * n` before the n-th retry.
    #[must_use]
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Runs `op`, retrying transient failures under this policy.
    ///
    /// # Errors
    ///
    /// Non-retryable errors propagate unchanged; retryable errors that
    /// survive every attempt become [`GateError::StoreUnavailable`].
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.base_delay * attempt;
                    tracing::warn!(error = %e, attempt, delay_ms = delay.as_millis() as u64,
                        "transient store error, backing off");
                    tokio::time::sleep(delay).await;
                }
                Err(e) if e.is_retryable() => {
                    return Err(GateError::StoreUnavailable(e.to_string()));
                }
                Err(e) => return Err(e),
            }
        }
    }
}
