//! Batch run summaries.

/// Outcome of a batch over every segment of a session.
///
/// # Examples
///
/// ```
/// use storyloom_pipeline::BatchReport;
///
/// let report = BatchReport::default();
/// assert!(report.is_complete());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Segments synthesized during this run
    pub generated: Vec<usize>,
    /// Segments that already had an asset
    pub skipped: Vec<usize>,
    /// Segments whose synthesis failed, with the error message
    pub failed: Vec<(usize, String)>,
    /// Whether the run stopped on the cancellation flag
    pub cancelled: bool,
}

impl BatchReport {
    /// No failures and no cancellation.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && !self.cancelled
    }
}

/// Summary of [`SpeechPipeline::narrate_all`](crate::SpeechPipeline::narrate_all).
pub type NarrationReport = BatchReport;

/// Summary of [`IllustrationPipeline::generate_all`](crate::IllustrationPipeline::generate_all).
pub type IllustrationReport = BatchReport;
