//! Gemini REST client for the Storyloom generation pipeline.
//!
//! [`GeminiClient`] implements all four capability traits from
//! `storyloom_interface` against the Generative Language REST API:
//! `generateContent` for text, structured JSON and speech, and Imagen
//! `predict` for images.
//!
//! # Example
//!
//! ```no_run
//! use storyloom_core::TextRequest;
//! use storyloom_interface::TextGeneration;
//! use storyloom_models::GeminiClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new()?;
//! let request = TextRequest::builder()
//!     .model("gemini-2.5-flash")
//!     .prompt("Name a lighthouse.")
//!     .build()?;
//! let text = client.generate_text(&request).await?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gemini;

pub use gemini::{
    Candidate, Content, ErrorBody, ErrorEnvelope, GeminiClient, GenerateContentRequest,
    GenerateContentResponse, GenerationConfig, InlineData, OutputOptions, Part, PredictInstance,
    PredictParameters, PredictRequest, PredictResponse, Prediction, PrebuiltVoiceConfig,
    PromptFeedback, SpeechConfig, VoiceConfig,
};
