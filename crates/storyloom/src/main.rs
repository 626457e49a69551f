//! Storyloom CLI binary.
//!
//! This binary drives the generation pipeline from the command line:
//! - Write a story from an idea, optionally narrated and illustrated
//! - Preview a narration voice
//! - Preview an illustration style

use clap::Parser;
use storyloom_retry::StoryloomConfig;

mod cli;
mod telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, WriteOptions, preview_style, preview_voice, write_story};

    // Parse command-line arguments
    let cli = Cli::parse();

    // API keys may live in a local .env file
    let _ = dotenvy::dotenv();

    telemetry::init_tracing(cli.verbose);

    let config = StoryloomConfig::load_from(cli.config.as_deref())?;

    match cli.command {
        Commands::Write {
            prompt,
            length,
            out,
            audio,
            voice,
            speech_style,
            illustrations,
            art_style,
        } => {
            let options = WriteOptions {
                prompt,
                length,
                out,
                audio,
                voice,
                speech_style,
                illustrations,
                art_style,
            };
            write_story(&config, options).await?;
        }

        Commands::PreviewVoice { voice, out } => {
            preview_voice(&config, voice, &out).await?;
        }

        Commands::PreviewStyle { style, out } => {
            preview_style(&config, style, &out).await?;
        }
    }

    Ok(())
}
