//! Generation pipeline error types.

/// Specific error conditions raised by the generation pipelines.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PipelineErrorKind {
    /// Input text was empty after trimming
    #[display("Input text is empty")]
    EmptyInput,
    /// Every speech sub-segment failed
    #[display("No audio data was generated for any of {} text segments", _0)]
    AllSegmentsFailed(usize),
    /// The visual prompt came back empty, so no image was requested
    #[display("Could not derive a visual prompt from the text")]
    MissingVisualPrompt,
    /// A request could not be assembled
    #[display("Invalid request: {}", _0)]
    InvalidRequest(String),
    /// Bytes are not a canonical PCM WAV container
    #[display("Invalid audio container: {}", _0)]
    InvalidContainer(String),
    /// Segment index outside the session's story
    #[display("Segment {} does not exist (story has {} segments)", index, len)]
    SegmentOutOfRange {
        /// Requested index
        index: usize,
        /// Number of segments in the session
        len: usize,
    },
    /// A story segment exhausted its retries, ending the session
    #[display("Story generation aborted at part {}: {}", segment, message)]
    SessionAborted {
        /// Index of the segment that failed
        segment: usize,
        /// Final error message
        message: String,
    },
}

/// Error type for pipeline operations.
///
/// # Examples
///
/// ```
/// use storyloom_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::new(PipelineErrorKind::EmptyInput);
/// assert!(format!("{}", err).contains("empty"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The specific error condition
    pub kind: PipelineErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
