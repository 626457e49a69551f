//! Visual prompt derivation and styled image synthesis.

use crate::{AssetStore, GenerationSession, IllustrationReport};
use std::time::Duration;
use storyloom_core::{IllustrationAsset, IllustrationStyle, ImageRequest, ProgressUpdate, TextRequest};
use storyloom_error::{PipelineError, PipelineErrorKind, StoryloomResult};
use storyloom_interface::{ImageSynthesis, ProgressSink, TextGeneration};
use storyloom_retry::{RetryAttempt, RetryPolicy, StoryloomConfig};
use tracing::{debug, info, instrument, warn};

/// Scene rendered by [`IllustrationPipeline::preview_style`].
pub const STYLE_PREVIEW_SCENE: &str = "a cute, fluffy cat sitting in a cozy library";

/// Two-stage illustration: segment text to visual prompt, prompt to image.
///
/// Prompt derivation retries transient failures. Image synthesis retries
/// only rate limits, with a much longer backoff.
#[derive(Debug, Clone)]
pub struct IllustrationPipeline<D> {
    driver: D,
    text_model: String,
    image_model: String,
    prompt_policy: RetryPolicy,
    image_policy: RetryPolicy,
    throttle: Duration,
}

impl<D> IllustrationPipeline<D>
where
    D: TextGeneration + ImageSynthesis,
{
    /// Pipeline with default models, policies and throttle.
    pub fn new(driver: D) -> Self {
        Self::from_config(driver, &StoryloomConfig::default())
    }

    /// Pipeline configured from `[models]`, `[retry.visual_prompt]`,
    /// `[retry.illustration]` and `[illustration]`.
    pub fn from_config(driver: D, config: &StoryloomConfig) -> Self {
        Self {
            driver,
            text_model: config.models.utility.clone(),
            image_model: config.models.image.clone(),
            prompt_policy: config.retry.visual_prompt,
            image_policy: config.retry.illustration,
            throttle: Duration::from_millis(config.illustration.throttle_ms),
        }
    }

    /// Override the pause between successive new syntheses in a batch.
    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    /// Underlying driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Reduce `text` to one sentence describing its main visual scene.
    ///
    /// # Errors
    ///
    /// The last service error once retries are spent, or
    /// `MissingVisualPrompt` if the service answered with blank text.
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    pub async fn derive_visual_prompt(&self, text: &str) -> StoryloomResult<String> {
        self.derive_visual_prompt_reporting(text, &|_: &RetryAttempt| {})
            .await
    }

    async fn derive_visual_prompt_reporting(
        &self,
        text: &str,
        on_retry: &(dyn Fn(&RetryAttempt) + Send + Sync),
    ) -> StoryloomResult<String> {
        let request = TextRequest::builder()
            .model(self.text_model.as_str())
            .prompt(format!(
                "Summarize the following text into a single, concise sentence that describes the main visual scene for an illustration. Focus on characters, setting, and key actions. Ignore dialogue and internal thoughts.\n\nText: \"{}\"",
                text
            ))
            .build()
            .map_err(|e| PipelineError::new(PipelineErrorKind::InvalidRequest(e)))?;

        let answer = self
            .prompt_policy
            .run(
                "visual prompt",
                || self.driver.generate_text(&request),
                on_retry,
            )
            .await?;
        let visual = answer.trim();
        if visual.is_empty() {
            warn!("Service returned an empty visual prompt");
            return Err(PipelineError::new(PipelineErrorKind::MissingVisualPrompt).into());
        }
        debug!(visual_prompt = %visual, "Derived visual prompt");
        Ok(visual.to_string())
    }

    /// Render `visual_prompt` as one 16:9 PNG in `style`.
    ///
    /// # Errors
    ///
    /// Any non-rate-limit failure is returned at once; rate limits are
    /// retried under the illustration policy first.
    #[instrument(skip(self, visual_prompt, style), fields(style = %style))]
    pub async fn synthesize_image(
        &self,
        visual_prompt: &str,
        style: &IllustrationStyle,
    ) -> StoryloomResult<Vec<u8>> {
        self.synthesize_image_reporting(visual_prompt, style, &|_: &RetryAttempt| {})
            .await
    }

    async fn synthesize_image_reporting(
        &self,
        visual_prompt: &str,
        style: &IllustrationStyle,
        on_retry: &(dyn Fn(&RetryAttempt) + Send + Sync),
    ) -> StoryloomResult<Vec<u8>> {
        let request = ImageRequest::widescreen_png(self.image_model.as_str(), style.prompt_for(visual_prompt));
        self.image_policy
            .run("illustration", || self.driver.synthesize_image(&request), on_retry)
            .await
    }

    /// Both stages for one piece of text.
    async fn illustrate_text(
        &self,
        text: &str,
        style: &IllustrationStyle,
        on_retry: &(dyn Fn(&RetryAttempt) + Send + Sync),
    ) -> StoryloomResult<IllustrationAsset> {
        let visual = self.derive_visual_prompt_reporting(text, on_retry).await?;
        let bytes = self.synthesize_image_reporting(&visual, style, on_retry).await?;
        Ok(IllustrationAsset::new(bytes, style.key()))
    }

    /// Generate the illustration for segment `index`, replacing any cached one.
    ///
    /// # Errors
    ///
    /// `SegmentOutOfRange`, or the failure of either stage. The cache is left
    /// untouched on failure.
    #[instrument(skip(self, session, progress, style), fields(style = %style))]
    pub async fn illustrate_segment(
        &self,
        session: &mut GenerationSession,
        index: usize,
        style: &IllustrationStyle,
        progress: &dyn ProgressSink,
    ) -> StoryloomResult<()> {
        let total = session.segments().len();
        let text = session.segment(index)?.text().clone();
        let percentage = ProgressUpdate::fraction(index, total);
        progress.report(ProgressUpdate::status(
            percentage,
            format!("Generating illustration for part {} of {}...", index + 1, total),
        ));

        let on_retry = |notice: &RetryAttempt| {
            progress.report(ProgressUpdate::status(percentage, notice.status()));
        };
        match self.illustrate_text(&text, style, &on_retry).await {
            Ok(asset) => {
                session.assets_mut().insert_illustration(index, asset);
                progress.report(ProgressUpdate::status(
                    ProgressUpdate::fraction(index + 1, total),
                    format!("Illustration ready for part {}.", index + 1),
                ));
                Ok(())
            }
            Err(e) => {
                warn!(index, error = %e, "Illustration failed");
                progress.report(ProgressUpdate::status(
                    percentage,
                    format!("Failed to generate illustration for part {}: {}", index + 1, e),
                ));
                Err(e)
            }
        }
    }

    /// Illustrate every segment without a cached image, one at a time.
    ///
    /// Successive new syntheses are separated by the configured throttle.
    /// Cancellation is checked before each segment; finished images are kept.
    #[instrument(skip(self, session, progress, style), fields(style = %style))]
    pub async fn generate_all(
        &self,
        session: &mut GenerationSession,
        style: &IllustrationStyle,
        progress: &dyn ProgressSink,
    ) -> IllustrationReport {
        let total = session.segments().len();
        let mut report = IllustrationReport::default();
        let mut attempted = false;

        for index in 0..total {
            if session.is_cancelled() {
                info!(index, "Illustration generation cancelled");
                progress.report(ProgressUpdate::status(
                    ProgressUpdate::fraction(index, total),
                    "Illustration generation cancelled.",
                ));
                report.cancelled = true;
                return report;
            }
            if session.assets().illustration(index).is_some() {
                report.skipped.push(index);
                continue;
            }
            if attempted && !self.throttle.is_zero() {
                debug!(throttle_ms = self.throttle.as_millis() as u64, "Throttling before next illustration");
                tokio::time::sleep(self.throttle).await;
            }
            attempted = true;

            match self.illustrate_segment(session, index, style, progress).await {
                Ok(()) => report.generated.push(index),
                Err(e) => report.failed.push((index, e.to_string())),
            }
        }

        progress.report(ProgressUpdate::status(100.0, "All illustrations complete!"));
        info!(
            generated = report.generated.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Illustration batch finished"
        );
        report
    }

    /// Render [`STYLE_PREVIEW_SCENE`] in `style`, cached per style key.
    ///
    /// # Errors
    ///
    /// Whatever [`synthesize_image`](Self::synthesize_image) returns.
    #[instrument(skip(self, store, style), fields(style = %style))]
    pub async fn preview_style(
        &self,
        store: &mut AssetStore,
        style: &IllustrationStyle,
    ) -> StoryloomResult<IllustrationAsset> {
        if let Some(cached) = store.style_preview(style.key()) {
            debug!("Using cached style preview");
            return Ok(cached.clone());
        }
        let bytes = self.synthesize_image(STYLE_PREVIEW_SCENE, style).await?;
        let asset = IllustrationAsset::new(bytes, style.key());
        store.insert_style_preview(style.key(), asset.clone());
        Ok(asset)
    }
}
