//! Progress reporting payloads.

use crate::StoryMetadata;
use serde::{Deserialize, Serialize};

/// One progress report emitted by a pipeline.
///
/// # Examples
///
/// ```
/// use storyloom_core::ProgressUpdate;
///
/// let update = ProgressUpdate::status(50.0, "Weaving part 2 of 2...");
/// assert!(update.chunk.is_none());
/// assert_eq!(update.to_string(), "[50%] Weaving part 2 of 2...");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::Display)]
#[display("[{:.0}%] {}", percentage, status)]
pub struct ProgressUpdate {
    /// Completion in `[0, 100]`
    pub percentage: f64,
    /// Newly finalized segment text, if this report completes one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk: Option<String>,
    /// Human-readable status line
    pub status: String,
    /// Story metadata, attached to the final report
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<StoryMetadata>,
}

impl ProgressUpdate {
    /// A report carrying only a status line.
    pub fn status(percentage: f64, status: impl Into<String>) -> Self {
        Self {
            percentage,
            chunk: None,
            status: status.into(),
            details: None,
        }
    }

    /// Attach a finalized segment.
    pub fn with_chunk(mut self, chunk: impl Into<String>) -> Self {
        self.chunk = Some(chunk.into());
        self
    }

    /// Attach story metadata.
    pub fn with_details(mut self, details: Option<StoryMetadata>) -> Self {
        self.details = details;
        self
    }

    /// Percentage of `done` out of `total`.
    pub fn fraction(done: usize, total: usize) -> f64 {
        if total == 0 {
            return 100.0;
        }
        done as f64 / total as f64 * 100.0
    }
}
