//! Gemini-specific error types and failure classification.

use crate::{ErrorClass, RetryableError};

/// Gemini-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GeminiErrorKind {
    /// API key not found in environment
    #[display("{} environment variable not set", _0)]
    MissingApiKey(String),
    /// Failed to create the HTTP client
    #[display("Failed to create Gemini client: {}", _0)]
    ClientCreation(String),
    /// API request failed without an HTTP status
    #[display("Gemini API request failed: {}", _0)]
    ApiRequest(String),
    /// HTTP error with status code and message
    #[display("HTTP {} error: {}", status_code, message)]
    HttpError {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// Connection dropped, timed out, or never established
    #[display("Transport failure: {}", _0)]
    Transport(String),
    /// The response carried no usable payload
    #[display("Empty response: {}", _0)]
    EmptyResponse(String),
    /// The response body could not be decoded
    #[display("Failed to parse response: {}", _0)]
    ResponseParse(String),
    /// Base64 decoding failed
    #[display("Base64 decode error: {}", _0)]
    Base64Decode(String),
}

impl GeminiErrorKind {
    /// Classify this error for retry purposes.
    pub fn class(&self) -> ErrorClass {
        match self {
            GeminiErrorKind::HttpError {
                status_code,
                message,
            } => match *status_code {
                429 => ErrorClass::RateLimit,
                408 | 500 | 502 | 503 | 504 => ErrorClass::TransientServer,
                _ if message.contains("RESOURCE_EXHAUSTED") => ErrorClass::RateLimit,
                _ => ErrorClass::Fatal,
            },
            GeminiErrorKind::ApiRequest(message) => classify_message(message),
            GeminiErrorKind::Transport(_) => ErrorClass::TransientServer,
            GeminiErrorKind::EmptyResponse(_) => ErrorClass::PartialData,
            GeminiErrorKind::MissingApiKey(_)
            | GeminiErrorKind::ClientCreation(_)
            | GeminiErrorKind::ResponseParse(_)
            | GeminiErrorKind::Base64Decode(_) => ErrorClass::Fatal,
        }
    }
}

/// Classify a status-less failure by the signatures the service puts in its messages.
fn classify_message(message: &str) -> ErrorClass {
    if message.contains("RESOURCE_EXHAUSTED") || message.contains("429") {
        ErrorClass::RateLimit
    } else if message.contains("UNAVAILABLE")
        || message.contains("INTERNAL")
        || message.contains("500")
        || message.contains("503")
    {
        ErrorClass::TransientServer
    } else {
        ErrorClass::Fatal
    }
}

/// Gemini error with source location tracking.
///
/// # Examples
///
/// ```
/// use storyloom_error::{GeminiError, GeminiErrorKind};
///
/// let err = GeminiError::new(GeminiErrorKind::MissingApiKey("GEMINI_API_KEY".to_string()));
/// assert!(format!("{}", err).contains("GEMINI_API_KEY"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Gemini Error: {} at line {} in {}", kind, line, file)]
pub struct GeminiError {
    /// The kind of error that occurred
    pub kind: GeminiErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GeminiError {
    /// Create a new GeminiError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GeminiErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl RetryableError for GeminiError {
    fn error_class(&self) -> ErrorClass {
        self.kind.class()
    }
}

/// Result type for Gemini operations.
pub type GeminiResult<T> = Result<T, GeminiError>;
