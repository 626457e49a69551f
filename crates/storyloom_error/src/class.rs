//! Failure classification shared by every remote call.

/// Coarse classification of a failed remote call.
///
/// Retry policies decide per class whether another attempt is made.
///
/// # Examples
///
/// ```
/// use storyloom_error::ErrorClass;
///
/// assert!(ErrorClass::RateLimit.is_transient());
/// assert!(ErrorClass::PartialData.is_transient());
/// assert!(!ErrorClass::Fatal.is_transient());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ErrorClass {
    /// Quota exhausted (HTTP 429, `RESOURCE_EXHAUSTED`)
    #[display("rate limit")]
    RateLimit,
    /// Server-side or transport hiccup (5xx, timeouts, dropped connections)
    #[display("transient server error")]
    TransientServer,
    /// Transport succeeded but the payload was empty or unusable
    #[display("partial data")]
    PartialData,
    /// Bad input, auth failures, malformed responses
    #[display("fatal")]
    Fatal,
}

impl ErrorClass {
    /// Rate limits, transient server failures and partial payloads are all worth retrying.
    pub fn is_transient(self) -> bool {
        !matches!(self, ErrorClass::Fatal)
    }

    /// True only for quota exhaustion.
    pub fn is_rate_limit(self) -> bool {
        matches!(self, ErrorClass::RateLimit)
    }
}

/// Trait for errors that support retry logic.
///
/// # Examples
///
/// ```
/// use storyloom_error::{ErrorClass, GeminiError, GeminiErrorKind, RetryableError};
///
/// let err = GeminiError::new(GeminiErrorKind::HttpError {
///     status_code: 503,
///     message: "Service unavailable".to_string(),
/// });
///
/// assert_eq!(err.error_class(), ErrorClass::TransientServer);
/// assert!(err.is_retryable());
/// ```
pub trait RetryableError {
    /// Classify this error.
    fn error_class(&self) -> ErrorClass;

    /// Returns true if this error should trigger a retry under a permissive policy.
    fn is_retryable(&self) -> bool {
        self.error_class().is_transient()
    }
}
