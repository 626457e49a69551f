//! One-directional progress channel.

use storyloom_core::ProgressUpdate;

/// Receiver of progress reports.
///
/// Any `Fn(ProgressUpdate)` closure is a sink.
///
/// # Examples
///
/// ```
/// use std::sync::Mutex;
/// use storyloom_core::ProgressUpdate;
/// use storyloom_interface::ProgressSink;
///
/// let seen = Mutex::new(Vec::new());
/// let sink = |update: ProgressUpdate| seen.lock().unwrap().push(update.status);
/// sink.report(ProgressUpdate::status(0.0, "Starting"));
/// assert_eq!(seen.lock().unwrap().len(), 1);
/// ```
pub trait ProgressSink: Send + Sync {
    /// Deliver one update.
    fn report(&self, update: ProgressUpdate);
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        self(update)
    }
}
