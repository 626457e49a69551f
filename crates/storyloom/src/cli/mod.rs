//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the storyloom binary.

mod commands;
mod output;
mod preview;
mod write;

pub use commands::{Cli, Commands};
pub use preview::{preview_style, preview_voice};
pub use write::{WriteOptions, write_story};
