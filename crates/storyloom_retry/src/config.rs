//! Layered TOML configuration.
//!
//! Sources, later ones winning:
//! 1. Bundled defaults (include_str! from storyloom.toml)
//! 2. `~/.config/storyloom/storyloom.toml`
//! 3. `./storyloom.toml`
//! 4. An explicit file passed to [`StoryloomConfig::load_from`]
//! 5. `STORYLOOM__SECTION__KEY` environment variables

use crate::RetryPolicy;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use storyloom_core::SamplingParams;
use storyloom_error::{ConfigError, StoryloomError, StoryloomResult};
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../storyloom.toml");

/// Remote service endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// REST base URL, without a trailing slash
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Per-request transport timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 300,
        }
    }
}

/// Model identifiers per task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Story segment generation
    pub story: String,
    /// Visual prompts, language detection and metadata
    pub utility: String,
    /// Text-to-speech
    pub speech: String,
    /// Image synthesis
    pub image: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            story: "gemini-2.5-pro".to_string(),
            utility: "gemini-2.5-flash".to_string(),
            speech: "gemini-2.5-flash-preview-tts".to_string(),
            image: "imagen-4.0-generate-001".to_string(),
        }
    }
}

/// One retry policy per kind of remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Story segment generation
    pub story_segment: RetryPolicy,
    /// Speech sub-segments
    pub speech: RetryPolicy,
    /// Visual prompt derivation
    pub visual_prompt: RetryPolicy,
    /// Image synthesis
    pub illustration: RetryPolicy,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            story_segment: RetryPolicy::story_segment(),
            speech: RetryPolicy::speech(),
            visual_prompt: RetryPolicy::visual_prompt(),
            illustration: RetryPolicy::illustration(),
        }
    }
}

/// Speech pipeline settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Character ceiling per synthesis call
    pub segment_chars: usize,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            segment_chars: 4_500,
        }
    }
}

/// Illustration pipeline settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IllustrationConfig {
    /// Pause between successive new syntheses in a batch
    pub throttle_ms: u64,
}

impl Default for IllustrationConfig {
    fn default() -> Self {
        Self { throttle_ms: 5_000 }
    }
}

/// Story composer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Trailing characters of the story passed as continuation context
    pub context_chars: usize,
    /// Leading characters of the story passed to the metadata call
    pub metadata_chars: usize,
    /// Leading characters used for language detection
    pub language_sample_chars: usize,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            context_chars: 50_000,
            metadata_chars: 150_000,
            language_sample_chars: 1_000,
        }
    }
}

/// Top-level Storyloom configuration.
///
/// # Example
///
/// ```no_run
/// use storyloom_retry::StoryloomConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = StoryloomConfig::load()?;
/// println!("Story model: {}", config.models.story);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryloomConfig {
    /// Endpoint settings
    pub api: ApiConfig,
    /// Model identifiers
    pub models: ModelConfig,
    /// Text sampling parameters
    pub sampling: SamplingParams,
    /// Retry policies
    pub retry: RetryConfig,
    /// Speech pipeline
    pub speech: SpeechConfig,
    /// Illustration pipeline
    pub illustration: IllustrationConfig,
    /// Story composer
    pub composer: ComposerConfig,
}

impl StoryloomConfig {
    /// Load configuration from bundled defaults, user files and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file cannot be parsed or the merged
    /// configuration is invalid.
    #[instrument]
    pub fn load() -> StoryloomResult<Self> {
        Self::load_from(None)
    }

    /// Like [`load`](Self::load), with an extra required file layered above
    /// the user files and below the environment.
    #[instrument(skip(path), fields(path = ?path.map(|p| p.display().to_string())))]
    pub fn load_from(path: Option<&Path>) -> StoryloomResult<Self> {
        debug!("Loading configuration with precedence: env > explicit > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/storyloom/storyloom.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("storyloom").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("STORYLOOM")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .map_err(|e| {
                StoryloomError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                StoryloomError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a single file layered over the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> StoryloomResult<Self> {
        debug!("Loading configuration from file");

        let config: Self = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                StoryloomError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                StoryloomError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Check invariants the pipelines rely on.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first offending field.
    pub fn validate(&self) -> StoryloomResult<()> {
        let policies = [
            ("story_segment", &self.retry.story_segment),
            ("speech", &self.retry.speech),
            ("visual_prompt", &self.retry.visual_prompt),
            ("illustration", &self.retry.illustration),
        ];
        for (name, policy) in policies {
            if policy.max_attempts == 0 {
                return Err(ConfigError::new(format!(
                    "retry.{}.max_attempts must be at least 1",
                    name
                ))
                .into());
            }
            if policy.max_delay_ms < policy.base_delay_ms {
                return Err(ConfigError::new(format!(
                    "retry.{}.max_delay_ms ({}) is below base_delay_ms ({})",
                    name, policy.max_delay_ms, policy.base_delay_ms
                ))
                .into());
            }
        }
        if self.speech.segment_chars == 0 {
            return Err(ConfigError::new("speech.segment_chars must be positive").into());
        }
        if self.composer.context_chars == 0 || self.composer.language_sample_chars == 0 {
            return Err(ConfigError::new("composer character windows must be positive").into());
        }
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::new("api.base_url must not be empty").into());
        }
        Ok(())
    }
}
