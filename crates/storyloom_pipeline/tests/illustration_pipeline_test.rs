//! Tests for the illustration pipeline.

mod test_utils;

use std::time::Duration;
use storyloom_core::{IllustrationAsset, IllustrationStyle, LengthTier};
use storyloom_error::PipelineErrorKind;
use storyloom_pipeline::{IllustrationPipeline, STYLE_PREVIEW_SCENE};
use test_utils::{MockService, PNG_MAGIC, ProgressLog, composed_session, http_error, pipeline_kind};
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn test_rate_limited_image_backs_off_twenty_then_forty_seconds() -> anyhow::Result<()> {
    let mock = MockService::new()
        .with_image(Err(http_error(429)))
        .with_image(Err(http_error(429)))
        .with_image(Ok(vec![7, 7, 7]));
    let pipeline = IllustrationPipeline::new(mock.clone());
    let start = Instant::now();

    let bytes = pipeline
        .synthesize_image("a keeper on the gallery", &IllustrationStyle::Anime)
        .await?;

    assert_eq!(bytes, vec![7, 7, 7]);
    assert_eq!(mock.image_calls(), 3);
    assert_eq!(start.elapsed(), Duration::from_secs(60));
    Ok(())
}

#[tokio::test]
async fn test_image_request_uses_style_phrase_and_widescreen() -> anyhow::Result<()> {
    let mock = MockService::new();
    let pipeline = IllustrationPipeline::new(mock.clone());

    pipeline
        .synthesize_image("a cat", &IllustrationStyle::LowPoly)
        .await?;

    let requests = mock.image_requests();
    assert_eq!(
        requests[0].prompt,
        "A stylized, geometric low-poly art piece of: a cat"
    );
    assert_eq!(requests[0].aspect_ratio, "16:9");
    assert_eq!(requests[0].mime_type, "image/png");
    assert_eq!(requests[0].model, "imagen-4.0-generate-001");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_server_error_on_image_is_not_retried() {
    let mock = MockService::new().with_image(Err(http_error(503)));
    let pipeline = IllustrationPipeline::new(mock.clone());
    let start = Instant::now();

    let result = pipeline
        .synthesize_image("a cat", &IllustrationStyle::Illustrated)
        .await;

    assert!(result.is_err());
    assert_eq!(mock.image_calls(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_visual_prompt_retries_server_errors() -> anyhow::Result<()> {
    let mock = MockService::new()
        .with_text(Err(http_error(500)))
        .with_text(Ok("  A keeper climbs the spiral stairs.  ".to_string()));
    let pipeline = IllustrationPipeline::new(mock.clone());
    let start = Instant::now();

    let visual = pipeline
        .derive_visual_prompt("He climbed. \"Again?\" he thought.")
        .await?;

    assert_eq!(visual, "A keeper climbs the spiral stairs.");
    assert_eq!(mock.text_calls(), 2);
    assert_eq!(start.elapsed(), Duration::from_secs(2));
    let prompt = mock.text_requests()[0].prompt().clone();
    assert!(prompt.starts_with("Summarize the following text into a single, concise sentence"));
    assert!(prompt.ends_with("Text: \"He climbed. \"Again?\" he thought.\""));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_illustrate_segment_reports_visual_prompt_retries() -> anyhow::Result<()> {
    let mut session = composed_session(LengthTier::VeryShort, &["Only part."]).await;
    let mock = MockService::new()
        .with_text(Err(http_error(503)))
        .with_text(Ok("A keeper climbs the spiral stairs.".to_string()));
    let pipeline = IllustrationPipeline::new(mock.clone());
    let log = ProgressLog::default();

    pipeline
        .illustrate_segment(&mut session, 0, &IllustrationStyle::Dreamy, &log)
        .await?;

    assert_eq!(
        log.statuses(),
        vec![
            "Generating illustration for part 1 of 1...".to_string(),
            "Network error. Retrying in 2s...".to_string(),
            "Illustration ready for part 1.".to_string(),
        ]
    );
    assert_eq!(mock.text_calls(), 2);
    Ok(())
}

#[tokio::test]
async fn test_blank_visual_prompt_blocks_image_synthesis() {
    let mut session = composed_session(LengthTier::VeryShort, &["Only part."]).await;
    let mock = MockService::new().with_text(Ok("   ".to_string()));
    let pipeline = IllustrationPipeline::new(mock.clone());
    let log = ProgressLog::default();

    let err = pipeline
        .illustrate_segment(&mut session, 0, &IllustrationStyle::Dreamy, &log)
        .await
        .unwrap_err();

    assert_eq!(
        pipeline_kind(&err),
        Some(&PipelineErrorKind::MissingVisualPrompt)
    );
    assert_eq!(mock.image_calls(), 0);
    assert!(session.assets().illustration(0).is_none());
    assert!(
        log.last()
            .is_some_and(|u| u.status.starts_with("Failed to generate illustration for part 1"))
    );
}

#[tokio::test]
async fn test_illustrate_segment_replaces_cached_asset() -> anyhow::Result<()> {
    let mut session = composed_session(LengthTier::VeryShort, &["Only part."]).await;
    session
        .assets_mut()
        .insert_illustration(0, IllustrationAsset::new(vec![1], "anime"));
    let pipeline = IllustrationPipeline::new(MockService::new());

    pipeline
        .illustrate_segment(
            &mut session,
            0,
            &IllustrationStyle::Watercolour,
            &ProgressLog::default(),
        )
        .await?;

    let asset = session.assets().illustration(0).cloned();
    assert_eq!(
        asset,
        Some(IllustrationAsset::new(PNG_MAGIC.to_vec(), "watercolour"))
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_generate_all_throttles_between_new_syntheses() {
    let mut session = composed_session(LengthTier::Short, &["Part one.", "Part two."]).await;
    let mock = MockService::new();
    let pipeline = IllustrationPipeline::new(mock.clone());
    let log = ProgressLog::default();
    let start = Instant::now();

    let report = pipeline
        .generate_all(&mut session, &IllustrationStyle::Cinema, &log)
        .await;

    assert!(report.is_complete());
    assert_eq!(report.generated, vec![0, 1]);
    assert_eq!(mock.image_calls(), 2);
    assert_eq!(start.elapsed(), Duration::from_secs(5));
    assert_eq!(session.assets().illustration_indices(), vec![0, 1]);
    assert_eq!(
        log.last().map(|u| u.status),
        Some("All illustrations complete!".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn test_generate_all_skips_cached_without_throttling() {
    let mut session = composed_session(LengthTier::Short, &["Part one.", "Part two."]).await;
    session
        .assets_mut()
        .insert_illustration(0, IllustrationAsset::new(vec![1], "cinema"));
    let mock = MockService::new();
    let pipeline = IllustrationPipeline::new(mock.clone());
    let start = Instant::now();

    let report = pipeline
        .generate_all(&mut session, &IllustrationStyle::Cinema, &ProgressLog::default())
        .await;

    assert_eq!(report.skipped, vec![0]);
    assert_eq!(report.generated, vec![1]);
    assert_eq!(mock.image_calls(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_generate_all_keeps_going_after_a_failure() {
    let mut session = composed_session(LengthTier::Short, &["Part one.", "Part two."]).await;
    let mock = MockService::new().with_image(Err(http_error(400)));
    let pipeline = IllustrationPipeline::new(mock.clone());

    let report = pipeline
        .generate_all(&mut session, &IllustrationStyle::Goth, &ProgressLog::default())
        .await;

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, 0);
    assert_eq!(report.generated, vec![1]);
    assert!(!report.is_complete());
}

#[tokio::test]
async fn test_generate_all_stops_when_cancelled() {
    let mut session = composed_session(LengthTier::Short, &["Part one.", "Part two."]).await;
    session.cancellation().cancel();
    let mock = MockService::new();
    let pipeline = IllustrationPipeline::new(mock.clone());
    let log = ProgressLog::default();

    let report = pipeline
        .generate_all(&mut session, &IllustrationStyle::Anime, &log)
        .await;

    assert!(report.cancelled);
    assert_eq!(mock.text_calls() + mock.image_calls(), 0);
    assert_eq!(
        log.last().map(|u| u.status),
        Some("Illustration generation cancelled.".to_string())
    );
}

#[tokio::test]
async fn test_style_preview_is_cached_per_style() -> anyhow::Result<()> {
    let mut session = composed_session(LengthTier::VeryShort, &["Only part."]).await;
    let mock = MockService::new();
    let pipeline = IllustrationPipeline::new(mock.clone());
    let custom = IllustrationStyle::Custom("pixel art".to_string());

    pipeline.preview_style(session.assets_mut(), &custom).await?;
    pipeline.preview_style(session.assets_mut(), &custom).await?;
    pipeline
        .preview_style(session.assets_mut(), &IllustrationStyle::Anime)
        .await?;

    let requests = mock.image_requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[0].prompt,
        format!(
            "A digital painting in the style of pixel art, depicting: {}",
            STYLE_PREVIEW_SCENE
        )
    );
    assert!(session.assets().style_preview("pixel art").is_some());
    assert!(session.assets().style_preview("anime").is_some());
    Ok(())
}
