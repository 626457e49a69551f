//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use storyloom_core::{IllustrationStyle, LengthTier, Voice};

/// Storyloom - turn a story idea into a chaptered story with narration and illustrations
#[derive(Parser, Debug)]
#[command(name = "storyloom")]
#[command(about = "Turn a story idea into a chaptered story with narration and illustrations", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Extra configuration file, layered above the user configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a story, then optionally narrate and illustrate it
    Write {
        /// The story idea
        #[arg(long)]
        prompt: String,

        /// Story length: very-short, short, medium or long
        #[arg(long, default_value = "long")]
        length: LengthTier,

        /// Output directory
        #[arg(long, default_value = "story")]
        out: PathBuf,

        /// Narrate every part
        #[arg(long)]
        audio: bool,

        /// Narration voice
        #[arg(long, default_value = "Kore")]
        voice: Voice,

        /// Delivery instruction placed before the narrated text
        #[arg(long, default_value = "")]
        speech_style: String,

        /// Illustrate every part
        #[arg(long)]
        illustrations: bool,

        /// Illustration style key
        #[arg(long, default_value = "illustrated")]
        art_style: IllustrationStyle,
    },

    /// Render a short sample of a narration voice
    PreviewVoice {
        /// Voice name
        voice: Voice,

        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },

    /// Render the preview scene in an illustration style
    PreviewStyle {
        /// Style key; unknown keys become a generic digital painting style
        style: IllustrationStyle,

        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}
