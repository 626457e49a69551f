//! Retry notices.

use std::time::Duration;
use storyloom_error::ErrorClass;

/// One failed attempt that is about to be retried.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use storyloom_error::ErrorClass;
/// use storyloom_retry::RetryAttempt;
///
/// let notice = RetryAttempt {
///     label: "story segment".to_string(),
///     attempt: 1,
///     max_attempts: 3,
///     delay: Duration::from_secs(5),
///     class: ErrorClass::TransientServer,
///     error: "HTTP 503".to_string(),
/// };
/// assert_eq!(notice.status(), "Network error. Retrying in 5s...");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryAttempt {
    /// Name of the operation being retried
    pub label: String,
    /// The attempt that just failed, starting at 1
    pub attempt: u32,
    /// Attempt budget of the policy
    pub max_attempts: u32,
    /// Sleep before the next attempt
    pub delay: Duration,
    /// Classification of the failure
    pub class: ErrorClass,
    /// Rendered error message
    pub error: String,
}

impl RetryAttempt {
    /// Human-readable status line for the progress channel.
    pub fn status(&self) -> String {
        let secs = self.delay.as_secs_f64();
        match self.class {
            ErrorClass::RateLimit => format!(
                "Rate limit hit. Retrying in {}s... (Attempt {}/{})",
                secs, self.attempt, self.max_attempts
            ),
            _ => format!("Network error. Retrying in {}s...", secs),
        }
    }

    /// Attempts left after this one.
    pub fn remaining(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempt)
    }
}
