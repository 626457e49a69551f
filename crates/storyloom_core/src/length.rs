//! Story length tiers.

use serde::{Deserialize, Serialize};

/// User-selected story length.
///
/// Each tier maps to a fixed `(target characters, segment count)` pair.
///
/// # Examples
///
/// ```
/// use storyloom_core::LengthTier;
///
/// assert_eq!(LengthTier::Medium.budget(), (50_000, 5));
/// assert_eq!(LengthTier::Medium.char_budget(), 10_000);
/// assert_eq!("very-short".parse::<LengthTier>().unwrap(), LengthTier::VeryShort);
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
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum LengthTier {
    /// One self-contained segment of about 1,000 characters
    #[strum(to_string = "very-short", serialize = "very_short", serialize = "very short")]
    VeryShort,
    /// Two segments, about 10,000 characters total
    Short,
    /// Five segments, about 50,000 characters total
    Medium,
    /// Twenty segments, about 200,000 characters total
    #[default]
    Long,
}

impl LengthTier {
    /// Target character count and number of segments for this tier.
    pub fn budget(self) -> (usize, usize) {
        match self {
            LengthTier::VeryShort => (1_000, 1),
            LengthTier::Short => (10_000, 2),
            LengthTier::Medium => (50_000, 5),
            LengthTier::Long => (200_000, 20),
        }
    }

    /// Total characters requested across the whole story.
    pub fn target_chars(self) -> usize {
        self.budget().0
    }

    /// Number of sequential segments.
    pub fn chunk_count(self) -> usize {
        self.budget().1
    }

    /// Characters requested per segment.
    pub fn char_budget(self) -> usize {
        let (target, count) = self.budget();
        target / count
    }
}
