//! Top-level error wrapper types.

use crate::{ConfigError, ErrorClass, GeminiError, PipelineError, RetryableError};

/// Union of every error family in the workspace.
///
/// # Examples
///
/// ```
/// use storyloom_error::{StoryloomError, ConfigError};
///
/// let config_err = ConfigError::new("retry.speech.max_attempts must be at least 1");
/// let err: StoryloomError = config_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StoryloomErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Gemini error
    #[from(GeminiError)]
    Gemini(GeminiError),
    /// Pipeline error
    #[from(PipelineError)]
    Pipeline(PipelineError),
}

/// Storyloom error with kind discrimination.
///
/// # Examples
///
/// ```
/// use storyloom_error::{StoryloomResult, ConfigError};
///
/// fn might_fail() -> StoryloomResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Storyloom Error: {}", _0)]
pub struct StoryloomError(Box<StoryloomErrorKind>);

impl StoryloomError {
    /// Create a new error from a kind.
    pub fn new(kind: StoryloomErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoryloomErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to StoryloomErrorKind
impl<T> From<T> for StoryloomError
where
    T: Into<StoryloomErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

impl RetryableError for StoryloomError {
    fn error_class(&self) -> ErrorClass {
        match self.kind() {
            StoryloomErrorKind::Gemini(e) => e.error_class(),
            _ => ErrorClass::Fatal,
        }
    }
}

/// Result type for Storyloom operations.
pub type StoryloomResult<T> = std::result::Result<T, StoryloomError>;
