//! Bounded retry with exponential backoff.
//!
//! Retrying is a cross-cutting concern, so it lives in one higher-order
//! wrapper instead of being embedded in any single adapter. Only transport
//! failures are retried: a response that failed to parse will fail again,
//! and configuration problems need operator action, not persistence.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use triage_core::AnalyzeError;

/// Backoff policy for one call site.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles each retry.
    pub initial_delay: Duration,
    /// Cap on the delay between attempts.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Default backoff with a configured attempt count.
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    /// Delay to sleep after the given 1-based attempt fails.
    fn delay_after(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        let delay = self.initial_delay * 2u32.pow(exp);
        delay.min(self.max_delay)
    }
}

/// Run `op`, retrying transport failures per `policy`.
///
/// Any other error, and success, return immediately.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, AnalyzeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AnalyzeError>>,
{
    let mut attempt = 1u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < policy.max_attempts => {
                let delay = policy.delay_after(attempt);
                warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "backend call failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
