//! Trait definitions for the remote generative service and its capabilities.

use async_trait::async_trait;
use storyloom_core::{ImageRequest, SpeechRequest, StructuredRequest, TextRequest};
use storyloom_error::StoryloomResult;

/// Core trait every remote backend implements.
///
/// Each capability is exposed through its own trait so pipelines can ask for
/// exactly what they call.
pub trait GenerativeDriver: Send + Sync {
    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;
}

/// Plain text generation.
#[async_trait]
pub trait TextGeneration: GenerativeDriver {
    /// Generate text for a prompt.
    ///
    /// # Errors
    ///
    /// Returns an error classified for retry when the call fails or the
    /// response carries no text.
    async fn generate_text(&self, req: &TextRequest) -> StoryloomResult<String>;
}

/// Text generation constrained to a JSON schema.
#[async_trait]
pub trait StructuredGeneration: GenerativeDriver {
    /// Generate a JSON value conforming to `req.schema`.
    async fn generate_json(&self, req: &StructuredRequest) -> StoryloomResult<serde_json::Value>;
}

/// Text-to-speech synthesis.
#[async_trait]
pub trait SpeechSynthesis: GenerativeDriver {
    /// Synthesize raw 24 kHz mono 16-bit little-endian PCM.
    ///
    /// An empty payload is reported as an error rather than an empty buffer.
    async fn synthesize_speech(&self, req: &SpeechRequest) -> StoryloomResult<Vec<u8>>;
}

/// Image synthesis.
#[async_trait]
pub trait ImageSynthesis: GenerativeDriver {
    /// Synthesize one encoded image.
    async fn synthesize_image(&self, req: &ImageRequest) -> StoryloomResult<Vec<u8>>;
}
