//! Error types for the Storyloom library.
//!
//! This crate provides the foundation error types used throughout the Storyloom workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Remote failures are additionally classified into an [`ErrorClass`] so the
//! retry layer can decide whether another attempt is worthwhile.
//!
//! # Examples
//!
//! ```
//! use storyloom_error::{PipelineError, PipelineErrorKind, StoryloomResult};
//!
//! fn narrate(text: &str) -> StoryloomResult<String> {
//!     if text.trim().is_empty() {
//!         Err(PipelineError::new(PipelineErrorKind::EmptyInput))?
//!     }
//!     Ok(text.to_string())
//! }
//!
//! match narrate("   ") {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod class;
mod config;
mod error;
mod gemini;
mod pipeline;

pub use class::{ErrorClass, RetryableError};
pub use config::ConfigError;
pub use error::{StoryloomError, StoryloomErrorKind, StoryloomResult};
pub use gemini::{GeminiError, GeminiErrorKind, GeminiResult};
pub use pipeline::{PipelineError, PipelineErrorKind};
