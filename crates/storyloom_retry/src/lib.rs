//! Retry policy and configuration for the Storyloom generation pipeline.
//!
//! Every remote call in the workspace runs under a [`RetryPolicy`]: capped
//! exponential backoff with a fixed attempt budget and a classifier choosing
//! which [`ErrorClass`](storyloom_error::ErrorClass)es are worth another try.
//! Policies and every other tunable are loaded through [`StoryloomConfig`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod attempt;
mod config;
mod policy;

pub use attempt::RetryAttempt;
pub use config::{
    ApiConfig, ComposerConfig, IllustrationConfig, ModelConfig, RetryConfig, SpeechConfig,
    StoryloomConfig,
};
pub use policy::{RetryOn, RetryPolicy};
