//! Voice and style preview command handlers.

use super::output::{file_key, write_artifact};
use std::path::Path;
use storyloom_core::{IllustrationStyle, Voice};
use storyloom_models::GeminiClient;
use storyloom_pipeline::{AssetStore, IllustrationPipeline, SpeechPipeline, wrap_asset};
use storyloom_retry::StoryloomConfig;
use tracing::info;

/// Write `voice-<name>.wav` with a short sample of `voice`.
pub async fn preview_voice(
    config: &StoryloomConfig,
    voice: Voice,
    out: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = GeminiClient::from_config(&config.api)?;
    let speech = SpeechPipeline::from_config(client, config);

    let asset = speech.preview_voice(&mut AssetStore::default(), voice).await?;
    let name = format!("voice-{}.wav", file_key(voice.as_ref()));
    let path = write_artifact(out, &name, &wrap_asset(&asset)).await?;
    info!(path = %path.display(), seconds = asset.duration_secs(), "Voice preview written");
    Ok(())
}

/// Write `style-<key>.png` rendering the preview scene in `style`.
pub async fn preview_style(
    config: &StoryloomConfig,
    style: IllustrationStyle,
    out: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = GeminiClient::from_config(&config.api)?;
    let illustrator = IllustrationPipeline::from_config(client, config);

    let asset = illustrator
        .preview_style(&mut AssetStore::default(), &style)
        .await?;
    let name = format!("style-{}.png", file_key(style.key()));
    let path = write_artifact(out, &name, asset.bytes()).await?;
    info!(path = %path.display(), "Style preview written");
    Ok(())
}
