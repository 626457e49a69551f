//! Trait definitions for the Storyloom generation pipeline.
//!
//! The pipelines only ever see a remote service through these traits, so any
//! provider (or a scripted test double) can stand behind them.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod progress;
mod traits;

pub use progress::ProgressSink;
pub use traits::{
    GenerativeDriver, ImageSynthesis, SpeechSynthesis, StructuredGeneration, TextGeneration,
};
