//! Tests for sentence-aware segmentation.

use storyloom_pipeline::split_text;

fn assert_well_formed(text: &str, max: usize) {
    let parts = split_text(text, max);
    assert_eq!(parts.concat(), text, "segments must reconstruct the input");
    for part in &parts {
        assert!(!part.is_empty());
        assert!(
            part.chars().count() <= max,
            "segment {:?} exceeds {} chars",
            part,
            max
        );
    }
}

#[test]
fn test_segments_reconstruct_input() {
    let samples = [
        "The keeper climbed the stairs. The lamp was cold! Would it light again?",
        "No punctuation at all just a long run of words that keeps going",
        "Wait... what?! Really?? Yes.",
        "   Leading spaces. Trailing spaces.   ",
        "Ünïcödé sëntences. Ärë fïnë tôö! 灯台守。 Done.",
        "a",
    ];
    for text in samples {
        for max in [1, 3, 7, 16, 40, 500] {
            assert_well_formed(text, max);
        }
    }
}

#[test]
fn test_empty_input_yields_no_segments() {
    assert!(split_text("", 4500).is_empty());
}

#[test]
fn test_sentences_pack_greedily() {
    let parts = split_text("One. Two. Three. Four.", 10);
    assert_eq!(parts, vec!["One. Two.", " Three.", " Four."]);
}

#[test]
fn test_long_sentence_is_hard_split() {
    let text = "a".repeat(25);
    let parts = split_text(&text, 10);
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0].len(), 10);
    assert_eq!(parts[1].len(), 10);
    assert_eq!(parts[2].len(), 5);
}

#[test]
fn test_hard_split_respects_char_boundaries() {
    let parts = split_text("ééééé", 2);
    assert_eq!(parts, vec!["éé", "éé", "é"]);
}

#[test]
fn test_text_within_limit_is_one_segment() {
    let text = "Short story. Ends here.";
    assert_eq!(split_text(text, 4500), vec![text]);
}
