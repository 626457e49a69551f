//! Capped exponential backoff.

use crate::RetryAttempt;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use storyloom_error::{ErrorClass, RetryableError};
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, error, instrument, warn};

/// Which error classes a policy retries.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum RetryOn {
    /// Rate limits, transient server failures and partial payloads
    #[default]
    #[display("transient")]
    Transient,
    /// Quota exhaustion only; anything else is terminal
    #[display("rate_limit_only")]
    RateLimitOnly,
}

impl RetryOn {
    /// Whether a failure of `class` earns another attempt.
    pub fn should_retry(self, class: ErrorClass) -> bool {
        match self {
            RetryOn::Transient => class.is_transient(),
            RetryOn::RateLimitOnly => class.is_rate_limit(),
        }
    }
}

/// Retry parameters for one kind of remote call.
///
/// Attempt `n` (starting at 1) that fails retryably is followed by a sleep of
/// `min(max_delay, base_delay * 2^(n-1))`. No jitter is applied.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use storyloom_retry::RetryPolicy;
///
/// let policy = RetryPolicy::illustration();
/// let delays: Vec<Duration> = policy.delays().collect();
/// assert_eq!(delays, vec![Duration::from_secs(20), Duration::from_secs(40)]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts including the first
    pub max_attempts: u32,
    /// Delay after the first failure
    pub base_delay_ms: u64,
    /// Upper bound on any single delay
    pub max_delay_ms: u64,
    /// Error classes that are retried
    #[serde(default)]
    pub retry_on: RetryOn,
}

impl RetryPolicy {
    /// Story segments: 3 attempts, 5s base.
    pub fn story_segment() -> Self {
        Self::transient(3, 5_000)
    }

    /// Speech sub-segments: 3 attempts, 1s base.
    pub fn speech() -> Self {
        Self::transient(3, 1_000)
    }

    /// Visual prompt derivation: 3 attempts, 2s base.
    pub fn visual_prompt() -> Self {
        Self::transient(3, 2_000)
    }

    /// Image synthesis: 3 attempts, 20s base, 60s cap, rate limits only.
    pub fn illustration() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 20_000,
            max_delay_ms: 60_000,
            retry_on: RetryOn::RateLimitOnly,
        }
    }

    /// A single attempt.
    pub fn no_retry() -> Self {
        Self::transient(1, 0)
    }

    fn transient(max_attempts: u32, base_delay_ms: u64) -> Self {
        Self {
            max_attempts,
            base_delay_ms,
            max_delay_ms: 60_000,
            retry_on: RetryOn::Transient,
        }
    }

    /// Sleep following failed attempt `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt.saturating_sub(1)).unwrap_or(u64::MAX);
        let millis = self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms);
        Duration::from_millis(millis)
    }

    /// The full delay schedule, one entry per retry.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + use<> {
        let policy = *self;
        (1..policy.max_attempts).map(move |attempt| policy.delay_for(attempt))
    }

    /// Run `operation` under this policy without retry notifications.
    pub async fn call<T, E, F, Fut>(&self, label: &str, operation: F) -> Result<T, E>
    where
        F: Fn() -> Fut + Sync,
        Fut: Future<Output = Result<T, E>> + Send,
        E: RetryableError + std::fmt::Display,
    {
        self.run(label, operation, &|_: &RetryAttempt| {}).await
    }

    /// Run `operation` under this policy.
    ///
    /// `on_retry` is invoked once per failed attempt that will be retried,
    /// before the backoff sleep. It is never invoked on success or on the
    /// final failure.
    ///
    /// # Errors
    ///
    /// Returns the last error when it is not retryable under `retry_on` or
    /// when the attempt budget is spent.
    #[instrument(skip(self, operation, on_retry), fields(max_attempts = self.max_attempts, retry_on = %self.retry_on))]
    pub async fn run<T, E, F, Fut>(
        &self,
        label: &str,
        operation: F,
        on_retry: &(dyn Fn(&RetryAttempt) + Send + Sync),
    ) -> Result<T, E>
    where
        F: Fn() -> Fut + Sync,
        Fut: Future<Output = Result<T, E>> + Send,
        E: RetryableError + std::fmt::Display,
    {
        let attempts = AtomicU32::new(0);
        let counter = &attempts;
        let operation = &operation;
        let policy = self;

        Retry::spawn(self.delays(), move || async move {
            let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(attempt, "{} succeeded after retry", label);
                    }
                    Ok(value)
                }
                Err(e) => {
                    let class = e.error_class();
                    if !policy.retry_on.should_retry(class) {
                        warn!(attempt, %class, error = %e, "{} failed permanently", label);
                        return Err(RetryError::Permanent(e));
                    }
                    if attempt >= policy.max_attempts {
                        error!(attempt, %class, error = %e, "{} failed after all retries", label);
                        return Err(RetryError::Permanent(e));
                    }
                    let notice = RetryAttempt {
                        label: label.to_string(),
                        attempt,
                        max_attempts: policy.max_attempts,
                        delay: policy.delay_for(attempt),
                        class,
                        error: e.to_string(),
                    };
                    warn!(
                        attempt,
                        max_attempts = policy.max_attempts,
                        delay_ms = notice.delay.as_millis() as u64,
                        %class,
                        error = %e,
                        "{} failed, will retry",
                        label
                    );
                    on_retry(&notice);
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
            }
        })
        .await
    }
}
