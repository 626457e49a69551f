//! Story writing command handler.

use super::output::{log_progress, part_file, story_markdown, write_artifact};
use std::path::PathBuf;
use storyloom_core::{IllustrationStyle, LengthTier, Voice};
use storyloom_models::GeminiClient;
use storyloom_pipeline::{
    BatchReport, CancellationFlag, CompositionOutcome, GenerationSession, IllustrationPipeline,
    SpeechPipeline, StoryComposer, wrap_asset,
};
use storyloom_retry::StoryloomConfig;
use tracing::{info, instrument, warn};

/// Options of the `write` command.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Story idea
    pub prompt: String,
    /// Length tier
    pub length: LengthTier,
    /// Output directory
    pub out: PathBuf,
    /// Narrate every part
    pub audio: bool,
    /// Narration voice
    pub voice: Voice,
    /// Delivery instruction for narration
    pub speech_style: String,
    /// Illustrate every part
    pub illustrations: bool,
    /// Illustration style
    pub art_style: IllustrationStyle,
}

/// Compose a story and write its artifacts to `options.out`.
///
/// The story file is written even when composition stops early. Ctrl-C sets
/// the session's cancellation flag; the step in flight finishes first.
#[instrument(skip(config, options), fields(length = %options.length, out = %options.out.display()))]
pub async fn write_story(
    config: &StoryloomConfig,
    options: WriteOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = GeminiClient::from_config(&config.api)?;

    let cancel = CancellationFlag::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping after the current step");
            interrupt.cancel();
        }
    });

    let mut session =
        GenerationSession::new(options.prompt.as_str(), options.length).with_cancellation(cancel);

    let composer = StoryComposer::from_config(client.clone(), config);
    let composed = composer.compose(&mut session, &log_progress).await;

    let path = write_artifact(&options.out, "story.md", story_markdown(&session).as_bytes()).await?;
    info!(path = %path.display(), parts = session.segments().len(), "Story written");
    if let Some(metadata) = session.metadata() {
        let json = serde_json::to_vec_pretty(metadata)?;
        write_artifact(&options.out, "details.json", &json).await?;
    }

    match composed? {
        CompositionOutcome::Completed => {}
        CompositionOutcome::Cancelled { next_segment } => {
            info!(next_segment, "Stopped before the story was finished");
            return Ok(());
        }
    }

    if options.audio {
        let speech = SpeechPipeline::from_config(client.clone(), config);
        let report = speech
            .narrate_all(&mut session, options.voice, &options.speech_style, &log_progress)
            .await;
        log_report("narration", &report);
        for index in session.assets().audio_indices() {
            if let Some(asset) = session.assets().audio(index) {
                write_artifact(&options.out, &part_file(index, "wav"), &wrap_asset(asset)).await?;
            }
        }
    }

    if options.illustrations && !session.is_cancelled() {
        let illustrator = IllustrationPipeline::from_config(client, config);
        let report = illustrator
            .generate_all(&mut session, &options.art_style, &log_progress)
            .await;
        log_report("illustration", &report);
        for index in session.assets().illustration_indices() {
            if let Some(asset) = session.assets().illustration(index) {
                write_artifact(&options.out, &part_file(index, "png"), asset.bytes()).await?;
            }
        }
    }

    Ok(())
}

fn log_report(stage: &str, report: &BatchReport) {
    for (index, error) in &report.failed {
        warn!(stage, part = index + 1, error = %error, "Part failed");
    }
    info!(
        stage,
        generated = report.generated.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        cancelled = report.cancelled,
        "Batch finished"
    );
}
