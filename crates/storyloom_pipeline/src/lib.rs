//! Story composition, narration and illustration pipelines for Storyloom.
//!
//! - [`StoryComposer`] requests story segments sequentially, keeping a sliding
//!   context window, truncating at sentence boundaries and finishing with
//!   language detection and structured metadata.
//! - [`SpeechPipeline`] splits text, synthesizes sub-segments concurrently and
//!   reassembles the PCM in order.
//! - [`IllustrationPipeline`] reduces a segment to a visual prompt and renders
//!   it in a chosen art style, throttling batch runs.
//!
//! All three read and write a [`GenerationSession`], which owns the story, its
//! cached assets and the [`CancellationFlag`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cancel;
mod composer;
mod illustration;
mod report;
mod segmenter;
mod session;
mod speech;
mod wav;

pub use cancel::CancellationFlag;
pub use composer::{
    CompositionOutcome, StoryComposer, SYSTEM_INSTRUCTION, detect_language_answer,
    truncate_to_budget,
};
pub use illustration::{IllustrationPipeline, STYLE_PREVIEW_SCENE};
pub use report::{BatchReport, IllustrationReport, NarrationReport};
pub use segmenter::{first_chars, last_chars, split_text};
pub use session::{AssetStore, GenerationSession};
pub use speech::SpeechPipeline;
pub use wav::{WAV_HEADER_LEN, WavHeader, wrap_asset, wrap_pcm};
