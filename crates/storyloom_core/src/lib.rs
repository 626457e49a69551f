//! Core data types for the Storyloom generation pipeline.
//!
//! This crate provides the plain data shared by the retry layer, the provider
//! client and the pipelines: story length tiers, segments and metadata, media
//! assets, style and voice presets, progress updates and request types.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod length;
mod media;
mod progress;
mod request;
mod story;
mod style;
mod voice;

pub use length::LengthTier;
pub use media::{AudioAsset, AudioFormat, IllustrationAsset};
pub use progress::ProgressUpdate;
pub use request::{
    ImageRequest, SamplingParams, SpeechRequest, StructuredRequest, TextRequest,
    TextRequestBuilder,
};
pub use story::{StoryMetadata, StorySegment};
pub use style::IllustrationStyle;
pub use voice::Voice;
