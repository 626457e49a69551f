//! Story segments and derived metadata.

use serde::{Deserialize, Serialize};

/// One finalized unit of story text.
///
/// # Examples
///
/// ```
/// use storyloom_core::StorySegment;
///
/// let segment = StorySegment::new(0, "Once upon a time.", 1000);
/// assert_eq!(*segment.index(), 0);
/// assert_eq!(segment.char_len(), 17);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct StorySegment {
    /// Position in the story, contiguous from zero
    index: usize,
    /// Segment text as appended to the story
    text: String,
    /// Character budget the segment was requested with
    char_budget: usize,
}

impl StorySegment {
    /// Create a segment.
    pub fn new(index: usize, text: impl Into<String>, char_budget: usize) -> Self {
        Self {
            index,
            text: text.into(),
            char_budget,
        }
    }

    /// Length of the text in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Auxiliary details generated once the story is complete.
///
/// Deserializes directly from the structured-output JSON, which carries no
/// `language` field; the composer fills it in afterward.
///
/// # Examples
///
/// ```
/// use storyloom_core::StoryMetadata;
///
/// let json = r##"{"synopsis":"A keeper tends a light.","hashtags":["#Sea"],"tags":["Drama"]}"##;
/// let metadata: StoryMetadata = serde_json::from_str(json).unwrap();
/// assert_eq!(metadata.hashtags, vec!["#Sea".to_string()]);
/// assert!(metadata.language.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryMetadata {
    /// Brief summary of the story
    pub synopsis: String,
    /// Social media hashtags
    pub hashtags: Vec<String>,
    /// Keyword tags for categorization
    pub tags: Vec<String>,
    /// Language all fields were written in
    #[serde(default)]
    pub language: String,
}

impl StoryMetadata {
    /// JSON schema requested from the structured-output endpoint.
    pub fn response_schema(language: &str) -> serde_json::Value {
        serde_json::json!({
            "type": "OBJECT",
            "properties": {
                "synopsis": {
                    "type": "STRING",
                    "description": format!("A brief summary of the story in {language}."),
                },
                "hashtags": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": format!("An array of social media hashtags in {language} (e.g., #ScienceFiction)."),
                },
                "tags": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": format!("An array of keyword tags in {language} (e.g., Cyberpunk)."),
                },
            },
            "required": ["synopsis", "hashtags", "tags"],
        })
    }
}
