//! Request types for the four remote endpoints.

use crate::Voice;
use serde::{Deserialize, Serialize};

/// Sampling parameters for text generation.
///
/// # Examples
///
/// ```
/// use storyloom_core::SamplingParams;
///
/// let sampling = SamplingParams::default();
/// assert_eq!(sampling.top_k, 40);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling mass
    pub top_p: f32,
    /// Top-k cutoff
    pub top_k: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.85,
            top_p: 0.95,
            top_k: 40,
        }
    }
}

/// Plain text generation request.
///
/// # Examples
///
/// ```
/// use storyloom_core::TextRequest;
///
/// let request = TextRequest::builder()
///     .model("gemini-2.5-flash")
///     .prompt("Name a lighthouse.")
///     .build()
///     .unwrap();
///
/// assert!(request.system_instruction().is_none());
/// ```
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder, derive_getters::Getters,
)]
#[builder(setter(into), build_fn(private, name = "build_internal"))]
pub struct TextRequest {
    /// Model identifier
    model: String,
    /// User prompt
    prompt: String,
    /// Optional system instruction
    #[builder(default, setter(into, strip_option))]
    system_instruction: Option<String>,
    /// Optional sampling overrides
    #[builder(default, setter(strip_option))]
    sampling: Option<SamplingParams>,
}

impl TextRequest {
    /// Creates a new request builder.
    pub fn builder() -> TextRequestBuilder {
        TextRequestBuilder::default()
    }
}

impl TextRequestBuilder {
    /// Build the TextRequest.
    ///
    /// # Errors
    ///
    /// Returns error if the model or prompt is missing.
    pub fn build(&self) -> Result<TextRequest, String> {
        self.build_internal().map_err(|e| e.to_string())
    }
}

/// Text generation constrained to a JSON schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredRequest {
    /// Model identifier
    pub model: String,
    /// User prompt
    pub prompt: String,
    /// Response schema in the service's OpenAPI subset
    pub schema: serde_json::Value,
}

/// Speech synthesis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechRequest {
    /// Model identifier
    pub model: String,
    /// Text to speak, already style-prefixed
    pub text: String,
    /// Prebuilt voice preset
    pub voice: Voice,
}

/// Image synthesis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    /// Model identifier
    pub model: String,
    /// Full, style-prefixed prompt
    pub prompt: String,
    /// Aspect ratio such as `16:9`
    pub aspect_ratio: String,
    /// Output MIME type
    pub mime_type: String,
}

impl ImageRequest {
    /// One widescreen PNG.
    pub fn widescreen_png(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            aspect_ratio: "16:9".to_string(),
            mime_type: "image/png".to_string(),
        }
    }
}
