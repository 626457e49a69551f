//! Prebuilt narration voices.

use serde::{Deserialize, Serialize};

/// Prebuilt voice preset offered by the speech endpoint.
///
/// # Examples
///
/// ```
/// use storyloom_core::Voice;
///
/// let voice: Voice = "puck".parse().unwrap();
/// assert_eq!(voice, Voice::Puck);
/// assert_eq!(voice.to_string(), "Puck");
/// assert_eq!(Voice::default(), Voice::Kore);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::EnumString,
    strum::Display,
    strum::AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Voice {
    /// Firm
    #[default]
    Kore,
    /// Upbeat
    Puck,
    /// Informative
    Charon,
    /// Excitable
    Fenrir,
    /// Bright
    Zephyr,
}
