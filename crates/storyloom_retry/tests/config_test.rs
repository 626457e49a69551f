use std::io::Write;
use storyloom_retry::{RetryOn, RetryPolicy, StoryloomConfig};

#[test]
fn bundled_defaults_match_presets() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(file, "# empty override")?;

    let config = StoryloomConfig::from_file(file.path())?;
    assert_eq!(config.retry.story_segment, RetryPolicy::story_segment());
    assert_eq!(config.retry.speech, RetryPolicy::speech());
    assert_eq!(config.retry.visual_prompt, RetryPolicy::visual_prompt());
    assert_eq!(config.retry.illustration, RetryPolicy::illustration());
    assert_eq!(config.speech.segment_chars, 4_500);
    assert_eq!(config.illustration.throttle_ms, 5_000);
    assert_eq!(config.composer.context_chars, 50_000);
    assert_eq!(config.models.story, "gemini-2.5-pro");
    assert_eq!(config.sampling.top_k, 40);
    Ok(())
}

#[test]
fn file_overrides_single_values() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(
        file,
        r#"
[retry.illustration]
max_attempts = 5
retry_on = "transient"

[models]
image = "imagen-test"
"#
    )?;

    let config = StoryloomConfig::from_file(file.path())?;
    assert_eq!(config.retry.illustration.max_attempts, 5);
    assert_eq!(config.retry.illustration.base_delay_ms, 20_000);
    assert_eq!(config.retry.illustration.retry_on, RetryOn::Transient);
    assert_eq!(config.models.image, "imagen-test");
    assert_eq!(config.models.speech, "gemini-2.5-flash-preview-tts");
    Ok(())
}

#[test]
fn zero_attempts_is_rejected() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(file, "[retry.speech]\nmax_attempts = 0")?;

    let err = StoryloomConfig::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("retry.speech.max_attempts"));
    Ok(())
}

#[test]
fn default_struct_validates() {
    assert!(StoryloomConfig::default().validate().is_ok());
}
