//! Text-to-speech with concurrent sub-segments.

use crate::segmenter::{first_chars, split_text};
use crate::{AssetStore, GenerationSession, NarrationReport};
use futures::future::join_all;
use storyloom_core::{AudioAsset, ProgressUpdate, SpeechRequest, Voice};
use storyloom_error::{PipelineError, PipelineErrorKind, StoryloomResult};
use storyloom_interface::{ProgressSink, SpeechSynthesis};
use storyloom_retry::{RetryAttempt, RetryPolicy, StoryloomConfig};
use tracing::{debug, error, info, instrument, warn};

/// Joined PCM for one text plus how many of its pieces were dropped.
struct Narration {
    pcm: Vec<u8>,
    pieces: usize,
    missing: usize,
}

/// Splits text into service-sized pieces, synthesizes them concurrently and
/// joins the PCM in text order.
#[derive(Debug, Clone)]
pub struct SpeechPipeline<D> {
    driver: D,
    model: String,
    policy: RetryPolicy,
    segment_chars: usize,
}

impl<D: SpeechSynthesis> SpeechPipeline<D> {
    /// Pipeline with default model, policy and segment size.
    pub fn new(driver: D) -> Self {
        Self::from_config(driver, &StoryloomConfig::default())
    }

    /// Pipeline configured from `[models]`, `[retry.speech]` and `[speech]`.
    pub fn from_config(driver: D, config: &StoryloomConfig) -> Self {
        Self {
            driver,
            model: config.models.speech.clone(),
            policy: config.retry.speech,
            segment_chars: config.speech.segment_chars,
        }
    }

    /// Override the sub-segment retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Override the per-call character ceiling.
    pub fn with_segment_chars(mut self, segment_chars: usize) -> Self {
        self.segment_chars = segment_chars.max(1);
        self
    }

    /// Underlying driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Synthesize `text` in `voice`, optionally prefixed by a delivery `style`.
    ///
    /// Sub-segments run concurrently; the output is their PCM concatenated in
    /// text order. A sub-segment that still fails after its retries is logged
    /// and left out, so the result may have gaps.
    ///
    /// # Errors
    ///
    /// `EmptyInput` when `text` is blank, `AllSegmentsFailed` when no
    /// sub-segment produced audio.
    #[instrument(skip(self, text, style, voice), fields(voice = %voice, chars = text.chars().count()))]
    pub async fn synthesize(&self, text: &str, voice: Voice, style: &str) -> StoryloomResult<Vec<u8>> {
        let narration = self
            .synthesize_reporting(text, voice, style, &|_: &RetryAttempt| {})
            .await?;
        Ok(narration.pcm)
    }

    async fn synthesize_reporting(
        &self,
        text: &str,
        voice: Voice,
        style: &str,
        on_retry: &(dyn Fn(&RetryAttempt) + Send + Sync),
    ) -> StoryloomResult<Narration> {
        if text.trim().is_empty() {
            warn!("Speech requested for empty text");
            return Err(PipelineError::new(PipelineErrorKind::EmptyInput).into());
        }

        let style = style.trim();
        let pieces: Vec<&str> = split_text(text, self.segment_chars)
            .into_iter()
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .collect();
        debug!(pieces = pieces.len(), "Split text for synthesis");

        let results = join_all(pieces.iter().enumerate().map(|(index, piece)| {
            let request = SpeechRequest {
                model: self.model.clone(),
                text: if style.is_empty() {
                    (*piece).to_string()
                } else {
                    format!("{}: {}", style, piece)
                },
                voice,
            };
            async move {
                let result = self
                    .policy
                    .run(
                        "speech segment",
                        || self.driver.synthesize_speech(&request),
                        on_retry,
                    )
                    .await;
                (index, result)
            }
        }))
        .await;

        let mut pcm = Vec::new();
        let mut missing = 0usize;
        for (index, result) in results {
            match result {
                Ok(mut piece_pcm) => {
                    if piece_pcm.len() % 2 != 0 {
                        warn!(index, len = piece_pcm.len(), "Dropping trailing byte of odd-length audio");
                        piece_pcm.pop();
                    }
                    pcm.extend_from_slice(&piece_pcm);
                }
                Err(e) => {
                    error!(
                        index,
                        error = %e,
                        text = first_chars(pieces[index], 50),
                        "Failed to synthesize speech segment"
                    );
                    missing += 1;
                }
            }
        }

        if missing == pieces.len() {
            return Err(PipelineError::new(PipelineErrorKind::AllSegmentsFailed(pieces.len())).into());
        }
        if missing > 0 {
            warn!(missing, total = pieces.len(), "Narration has gaps");
        }
        Ok(Narration {
            pcm,
            pieces: pieces.len(),
            missing,
        })
    }

    /// Narrate segment `index` of `session` and cache the audio.
    ///
    /// Retries are reported through `progress`. Audio with dropped pieces is
    /// still cached, and its final status names how many pieces are missing.
    ///
    /// # Errors
    ///
    /// `SegmentOutOfRange` for a missing segment, otherwise whatever
    /// [`synthesize`](Self::synthesize) returns.
    #[instrument(skip(self, session, style, progress, voice), fields(voice = %voice))]
    pub async fn narrate_segment(
        &self,
        session: &mut GenerationSession,
        index: usize,
        voice: Voice,
        style: &str,
        progress: &dyn ProgressSink,
    ) -> StoryloomResult<()> {
        let total = session.segments().len();
        let text = session.segment(index)?.text().clone();
        let percentage = ProgressUpdate::fraction(index, total);
        progress.report(ProgressUpdate::status(
            percentage,
            format!("Generating audio for part {} of {}...", index + 1, total),
        ));

        let on_retry = |notice: &RetryAttempt| {
            progress.report(ProgressUpdate::status(percentage, notice.status()));
        };
        match self.synthesize_reporting(&text, voice, style, &on_retry).await {
            Ok(narration) => {
                let status = if narration.missing > 0 {
                    format!(
                        "Audio for part {} has gaps ({} of {} pieces failed).",
                        index + 1,
                        narration.missing,
                        narration.pieces
                    )
                } else {
                    format!("Audio ready for part {}.", index + 1)
                };
                session.assets_mut().insert_audio(index, AudioAsset::speech(narration.pcm));
                progress.report(ProgressUpdate::status(
                    ProgressUpdate::fraction(index + 1, total),
                    status,
                ));
                Ok(())
            }
            Err(e) => {
                progress.report(ProgressUpdate::status(
                    percentage,
                    format!("Failed to generate audio for part {}: {}", index + 1, e),
                ));
                Err(e)
            }
        }
    }

    /// Narrate every segment without audio, in order.
    ///
    /// Cached segments are skipped. Failures are recorded and the batch moves
    /// on. Cancellation is checked before each segment.
    #[instrument(skip(self, session, style, progress, voice), fields(voice = %voice))]
    pub async fn narrate_all(
        &self,
        session: &mut GenerationSession,
        voice: Voice,
        style: &str,
        progress: &dyn ProgressSink,
    ) -> NarrationReport {
        let total = session.segments().len();
        let mut report = NarrationReport::default();

        for index in 0..total {
            if session.is_cancelled() {
                info!(index, "Audio generation cancelled");
                progress.report(ProgressUpdate::status(
                    ProgressUpdate::fraction(index, total),
                    "Audio generation cancelled.",
                ));
                report.cancelled = true;
                return report;
            }
            if session.assets().audio(index).is_some() {
                report.skipped.push(index);
                continue;
            }
            match self.narrate_segment(session, index, voice, style, progress).await {
                Ok(()) => report.generated.push(index),
                Err(e) => report.failed.push((index, e.to_string())),
            }
        }

        progress.report(ProgressUpdate::status(100.0, "All audio generation complete!"));
        info!(
            generated = report.generated.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Audio batch finished"
        );
        report
    }

    /// Short sample of `voice` reading its own name, cached per voice.
    ///
    /// # Errors
    ///
    /// Whatever [`synthesize`](Self::synthesize) returns.
    #[instrument(skip(self, store, voice), fields(voice = %voice))]
    pub async fn preview_voice(&self, store: &mut AssetStore, voice: Voice) -> StoryloomResult<AudioAsset> {
        if let Some(cached) = store.voice_preview(voice.as_ref()) {
            debug!("Using cached voice preview");
            return Ok(cached.clone());
        }
        let pcm = self.synthesize(voice.as_ref(), voice, "").await?;
        let asset = AudioAsset::speech(pcm);
        store.insert_voice_preview(voice.as_ref(), asset.clone());
        Ok(asset)
    }
}
