//! Gemini provider.

mod client;
mod dto;

pub use client::GeminiClient;
pub use dto::{
    Candidate, Content, ErrorBody, ErrorEnvelope, GenerateContentRequest,
    GenerateContentResponse, GenerationConfig, InlineData, OutputOptions, Part, PredictInstance,
    PredictParameters, PredictRequest, PredictResponse, Prediction, PrebuiltVoiceConfig,
    PromptFeedback, SpeechConfig, VoiceConfig,
};
