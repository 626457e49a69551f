//! Tests for the speech synthesis pipeline.

mod test_utils;

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use storyloom_core::{AudioAsset, LengthTier, Voice};
use storyloom_error::PipelineErrorKind;
use storyloom_pipeline::SpeechPipeline;
use test_utils::{MockService, ProgressLog, composed_session, echo_pcm, http_error, pipeline_kind};
use tokio::time::Instant;

const THREE_SENTENCES: &str = "First one. Second one. Third one.";

fn expected(pieces: &[&str]) -> Vec<u8> {
    pieces.iter().flat_map(|p| echo_pcm(p)).collect()
}

#[tokio::test(start_paused = true)]
async fn test_output_keeps_text_order_when_completions_are_scrambled() -> anyhow::Result<()> {
    let mock = MockService::new().with_speech(|req| {
        let delay = match req.text.as_str() {
            "First one." => 300,
            "Second one." => 200,
            _ => 100,
        };
        (Duration::from_millis(delay), Ok(echo_pcm(&req.text)))
    });
    let pipeline = SpeechPipeline::new(mock.clone()).with_segment_chars(12);

    let pcm = pipeline.synthesize(THREE_SENTENCES, Voice::Kore, "").await?;

    assert_eq!(pcm, expected(&["First one.", "Second one.", "Third one."]));
    assert_eq!(mock.speech_calls(), 3);
    Ok(())
}

#[tokio::test]
async fn test_style_prefix_and_voice_are_sent() -> anyhow::Result<()> {
    let mock = MockService::new();
    let pipeline = SpeechPipeline::new(mock.clone());

    pipeline
        .synthesize("Hello there.", Voice::Puck, "  Say cheerfully ")
        .await?;

    let requests = mock.speech_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].text, "Say cheerfully: Hello there.");
    assert_eq!(requests[0].voice, Voice::Puck);
    assert_eq!(requests[0].model, "gemini-2.5-flash-preview-tts");
    Ok(())
}

#[tokio::test]
async fn test_failed_sub_segment_leaves_a_gap() -> anyhow::Result<()> {
    let mock = MockService::new().with_speech(|req| {
        if req.text == "Second one." {
            (Duration::ZERO, Err(http_error(400)))
        } else {
            (Duration::ZERO, Ok(echo_pcm(&req.text)))
        }
    });
    let pipeline = SpeechPipeline::new(mock.clone()).with_segment_chars(12);

    let pcm = pipeline.synthesize(THREE_SENTENCES, Voice::Kore, "").await?;

    assert_eq!(pcm, expected(&["First one.", "Third one."]));
    // A fatal error is not retried
    assert_eq!(mock.speech_calls(), 3);
    Ok(())
}

#[tokio::test]
async fn test_all_sub_segments_failing_is_an_error() {
    let mock = MockService::new().with_speech(|_| (Duration::ZERO, Err(http_error(401))));
    let pipeline = SpeechPipeline::new(mock).with_segment_chars(12);

    let err = pipeline
        .synthesize(THREE_SENTENCES, Voice::Kore, "")
        .await
        .unwrap_err();

    assert_eq!(
        pipeline_kind(&err),
        Some(&PipelineErrorKind::AllSegmentsFailed(3))
    );
}

#[tokio::test]
async fn test_blank_text_is_rejected_without_calls() {
    let mock = MockService::new();
    let pipeline = SpeechPipeline::new(mock.clone());

    let err = pipeline.synthesize("  \n\t ", Voice::Kore, "").await.unwrap_err();

    assert_eq!(pipeline_kind(&err), Some(&PipelineErrorKind::EmptyInput));
    assert_eq!(mock.speech_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_transient_failure_is_retried_after_one_second() -> anyhow::Result<()> {
    let calls = AtomicU32::new(0);
    let mock = MockService::new().with_speech(move |req| {
        if calls.fetch_add(1, Ordering::SeqCst) == 0 {
            (Duration::ZERO, Err(http_error(503)))
        } else {
            (Duration::ZERO, Ok(echo_pcm(&req.text)))
        }
    });
    let pipeline = SpeechPipeline::new(mock.clone());
    let start = Instant::now();

    let pcm = pipeline.synthesize("Hello.", Voice::Kore, "").await?;

    assert_eq!(pcm, echo_pcm("Hello."));
    assert_eq!(mock.speech_calls(), 2);
    assert_eq!(start.elapsed(), Duration::from_secs(1));
    Ok(())
}

#[tokio::test]
async fn test_odd_length_audio_is_trimmed() -> anyhow::Result<()> {
    let mock = MockService::new().with_speech(|_| (Duration::ZERO, Ok(vec![1, 2, 3])));
    let pipeline = SpeechPipeline::new(mock).with_segment_chars(12);

    let pcm = pipeline.synthesize(THREE_SENTENCES, Voice::Kore, "").await?;

    assert_eq!(pcm, vec![1, 2, 1, 2, 1, 2]);
    Ok(())
}

#[tokio::test]
async fn test_narrate_all_skips_cached_segments() {
    let mut session = composed_session(LengthTier::Short, &["Part one.", "Part two."]).await;
    session
        .assets_mut()
        .insert_audio(0, AudioAsset::speech(vec![0, 0]));
    let mock = MockService::new();
    let pipeline = SpeechPipeline::new(mock.clone());
    let log = ProgressLog::default();

    let report = pipeline
        .narrate_all(&mut session, Voice::Zephyr, "", &log)
        .await;

    assert!(report.is_complete());
    assert_eq!(report.skipped, vec![0]);
    assert_eq!(report.generated, vec![1]);
    assert_eq!(mock.speech_calls(), 1);
    assert_eq!(
        session.assets().audio(1).map(|a| a.pcm().clone()),
        Some(echo_pcm("Part two."))
    );
    let statuses = log.statuses();
    assert!(statuses.contains(&"Generating audio for part 2 of 2...".to_string()));
    assert_eq!(
        statuses.last().map(String::as_str),
        Some("All audio generation complete!")
    );
}

#[tokio::test]
async fn test_narrate_all_records_failures_and_continues() {
    let mut session = composed_session(LengthTier::Short, &["Part one.", "Part two."]).await;
    let mock = MockService::new().with_speech(|req| {
        if req.text == "Part one." {
            (Duration::ZERO, Err(http_error(403)))
        } else {
            (Duration::ZERO, Ok(echo_pcm(&req.text)))
        }
    });
    let pipeline = SpeechPipeline::new(mock);

    let report = pipeline
        .narrate_all(&mut session, Voice::Kore, "", &ProgressLog::default())
        .await;

    assert_eq!(report.generated, vec![1]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, 0);
    assert!(session.assets().audio(0).is_none());
}

#[tokio::test]
async fn test_narrate_all_stops_when_cancelled() {
    let mut session = composed_session(LengthTier::Short, &["Part one.", "Part two."]).await;
    session.cancellation().cancel();
    let mock = MockService::new();
    let pipeline = SpeechPipeline::new(mock.clone());
    let log = ProgressLog::default();

    let report = pipeline.narrate_all(&mut session, Voice::Kore, "", &log).await;

    assert!(report.cancelled);
    assert_eq!(mock.speech_calls(), 0);
    assert_eq!(
        log.last().map(|u| u.status),
        Some("Audio generation cancelled.".to_string())
    );
}

#[tokio::test]
async fn test_narrate_segment_out_of_range() {
    let mut session = composed_session(LengthTier::VeryShort, &["Only part."]).await;
    let pipeline = SpeechPipeline::new(MockService::new());

    let err = pipeline
        .narrate_segment(&mut session, 3, Voice::Kore, "", &ProgressLog::default())
        .await
        .unwrap_err();

    assert_eq!(
        pipeline_kind(&err),
        Some(&PipelineErrorKind::SegmentOutOfRange { index: 3, len: 1 })
    );
}

#[tokio::test]
async fn test_narrate_segment_reports_gaps() -> anyhow::Result<()> {
    let mut session = composed_session(LengthTier::VeryShort, &[THREE_SENTENCES]).await;
    let mock = MockService::new().with_speech(|req| {
        if req.text == "Second one." {
            (Duration::ZERO, Err(http_error(400)))
        } else {
            (Duration::ZERO, Ok(echo_pcm(&req.text)))
        }
    });
    let pipeline = SpeechPipeline::new(mock).with_segment_chars(12);
    let log = ProgressLog::default();

    pipeline
        .narrate_segment(&mut session, 0, Voice::Kore, "", &log)
        .await?;

    assert_eq!(
        log.statuses(),
        vec![
            "Generating audio for part 1 of 1...".to_string(),
            "Audio for part 1 has gaps (1 of 3 pieces failed).".to_string(),
        ]
    );
    assert_eq!(
        session.assets().audio(0).map(|a| a.pcm().clone()),
        Some(expected(&["First one.", "Third one."]))
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_narrate_segment_reports_retries() -> anyhow::Result<()> {
    let mut session = composed_session(LengthTier::VeryShort, &["Only part."]).await;
    let calls = AtomicU32::new(0);
    let mock = MockService::new().with_speech(move |req| {
        if calls.fetch_add(1, Ordering::SeqCst) == 0 {
            (Duration::ZERO, Err(http_error(503)))
        } else {
            (Duration::ZERO, Ok(echo_pcm(&req.text)))
        }
    });
    let pipeline = SpeechPipeline::new(mock);
    let log = ProgressLog::default();

    pipeline
        .narrate_segment(&mut session, 0, Voice::Kore, "", &log)
        .await?;

    assert_eq!(
        log.statuses(),
        vec![
            "Generating audio for part 1 of 1...".to_string(),
            "Network error. Retrying in 1s...".to_string(),
            "Audio ready for part 1.".to_string(),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_voice_preview_is_cached() -> anyhow::Result<()> {
    let mut session = composed_session(LengthTier::VeryShort, &["Only part."]).await;
    let mock = MockService::new();
    let pipeline = SpeechPipeline::new(mock.clone());

    let first = pipeline
        .preview_voice(session.assets_mut(), Voice::Charon)
        .await?;
    let second = pipeline
        .preview_voice(session.assets_mut(), Voice::Charon)
        .await?;

    assert_eq!(first, second);
    assert_eq!(first.pcm(), &echo_pcm("Charon"));
    let requests = mock.speech_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].text, "Charon");
    assert_eq!(requests[0].voice, Voice::Charon);
    Ok(())
}
