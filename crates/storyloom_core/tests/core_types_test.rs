use std::str::FromStr;
use storyloom_core::{
    AudioAsset, AudioFormat, IllustrationStyle, LengthTier, ProgressUpdate, StoryMetadata,
    TextRequest, Voice,
};
use strum::IntoEnumIterator;

#[test]
fn length_tiers_match_fixed_table() {
    let table: Vec<(LengthTier, usize, usize)> = LengthTier::iter()
        .map(|tier| (tier, tier.target_chars(), tier.chunk_count()))
        .collect();

    assert_eq!(
        table,
        vec![
            (LengthTier::VeryShort, 1_000, 1),
            (LengthTier::Short, 10_000, 2),
            (LengthTier::Medium, 50_000, 5),
            (LengthTier::Long, 200_000, 20),
        ]
    );
}

#[test]
fn char_budget_divides_target_evenly() {
    assert_eq!(LengthTier::VeryShort.char_budget(), 1_000);
    assert_eq!(LengthTier::Short.char_budget(), 5_000);
    assert_eq!(LengthTier::Medium.char_budget(), 10_000);
    assert_eq!(LengthTier::Long.char_budget(), 10_000);
}

#[test]
fn length_tier_parses_common_spellings() {
    assert_eq!(LengthTier::from_str("very short"), Ok(LengthTier::VeryShort));
    assert_eq!(LengthTier::from_str("VERY_SHORT"), Ok(LengthTier::VeryShort));
    assert_eq!(LengthTier::from_str("Medium"), Ok(LengthTier::Medium));
    assert!(LengthTier::from_str("epic").is_err());
    assert_eq!(LengthTier::VeryShort.to_string(), "very-short");
}

#[test]
fn voice_parses_case_insensitively() {
    assert_eq!(Voice::from_str("ZEPHYR"), Ok(Voice::Zephyr));
    assert_eq!(Voice::from_str("charon"), Ok(Voice::Charon));
    assert!(Voice::from_str("Alto").is_err());
    assert_eq!(Voice::iter().count(), 5);
}

#[test]
fn every_preset_style_round_trips_through_its_key() {
    for style in IllustrationStyle::PRESETS {
        let parsed = IllustrationStyle::from_str(style.key()).unwrap();
        assert_eq!(&parsed, style);
        assert!(!style.phrase().contains("digital painting in the style of"));
    }
    assert_eq!(IllustrationStyle::PRESETS.len(), 22);
}

#[test]
fn unknown_style_falls_back_to_generic_phrase() {
    let style = IllustrationStyle::from_str("stained glass").unwrap();
    assert_eq!(style, IllustrationStyle::Custom("stained glass".to_string()));
    assert_eq!(
        style.prompt_for("a lighthouse at dusk"),
        "A digital painting in the style of stained glass, depicting: a lighthouse at dusk"
    );
}

#[test]
fn style_prompt_joins_phrase_and_scene() {
    let style = IllustrationStyle::from_str("LOW-POLY").unwrap();
    assert_eq!(
        style.prompt_for("a fox in snow"),
        "A stylized, geometric low-poly art piece of: a fox in snow"
    );
}

#[test]
fn speech_asset_keeps_whole_samples() {
    let asset = AudioAsset::speech(vec![0u8; 48_001]);
    assert_eq!(asset.pcm().len(), 48_000);
    assert_eq!(*asset.format(), AudioFormat::SPEECH);
    assert!((asset.duration_secs() - 1.0).abs() < f64::EPSILON);
}

#[test]
fn progress_fraction_handles_partial_and_empty() {
    assert_eq!(ProgressUpdate::fraction(1, 4), 25.0);
    assert_eq!(ProgressUpdate::fraction(0, 0), 100.0);
}

#[test]
fn metadata_schema_names_language() {
    let schema = StoryMetadata::response_schema("Indonesian");
    let description = schema["properties"]["synopsis"]["description"]
        .as_str()
        .unwrap();
    assert!(description.contains("Indonesian"));
    assert_eq!(schema["required"].as_array().unwrap().len(), 3);
}

#[test]
fn text_request_requires_prompt() {
    let missing = TextRequest::builder().model("gemini-2.5-pro").build();
    assert!(missing.is_err());

    let request = TextRequest::builder()
        .model("gemini-2.5-pro")
        .prompt("Continue.")
        .system_instruction("You are a novelist.")
        .build()
        .unwrap();
    assert_eq!(request.system_instruction().as_deref(), Some("You are a novelist."));
}
