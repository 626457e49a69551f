//! Session builders and inspection helpers.
#![allow(dead_code)]

use super::MockService;
use std::sync::Mutex;
use storyloom_core::{LengthTier, ProgressUpdate};
use storyloom_error::{GeminiErrorKind, PipelineErrorKind, StoryloomError, StoryloomErrorKind};
use storyloom_interface::ProgressSink;
use storyloom_pipeline::{GenerationSession, StoryComposer};

/// HTTP failure with the given status.
pub fn http_error(status_code: u16) -> GeminiErrorKind {
    GeminiErrorKind::HttpError {
        status_code,
        message: format!("HTTP {}", status_code),
    }
}

/// The pipeline error kind carried by `err`, if any.
pub fn pipeline_kind(err: &StoryloomError) -> Option<&PipelineErrorKind> {
    match err.kind() {
        StoryloomErrorKind::Pipeline(e) => Some(&e.kind),
        _ => None,
    }
}

/// Compose a session whose segments are exactly `parts`.
///
/// Each part must fit its tier's character budget.
pub async fn composed_session(tier: LengthTier, parts: &[&str]) -> GenerationSession {
    assert_eq!(parts.len(), tier.chunk_count(), "one part per segment");
    let mock = MockService::new().with_texts(parts.iter().copied());
    let composer = StoryComposer::new(mock);
    let mut session = GenerationSession::new("a lighthouse keeper", tier);
    composer
        .compose(&mut session, &|_: ProgressUpdate| {})
        .await
        .expect("composition succeeds");
    session
}

/// Progress sink that records every update.
#[derive(Default)]
pub struct ProgressLog(Mutex<Vec<ProgressUpdate>>);

impl ProgressLog {
    pub fn updates(&self) -> Vec<ProgressUpdate> {
        self.0.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.updates().into_iter().map(|u| u.status).collect()
    }

    pub fn last(&self) -> Option<ProgressUpdate> {
        self.0.lock().unwrap().last().cloned()
    }
}

impl ProgressSink for ProgressLog {
    fn report(&self, update: ProgressUpdate) {
        self.0.lock().unwrap().push(update);
    }
}
