//! Test utilities for pipeline tests.
//!
//! This module provides a scripted mock of the generative service and
//! helpers for building sessions and inspecting results.

pub mod fixtures;
pub mod mock_service;

#[allow(unused_imports)]
pub use fixtures::{ProgressLog, composed_session, http_error, pipeline_kind};
#[allow(unused_imports)]
pub use mock_service::{MockResult, MockService, PNG_MAGIC, echo_pcm};
