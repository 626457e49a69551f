//! Illustration art styles.

use serde::{Deserialize, Serialize};

/// Art style applied to image prompts.
///
/// Parsing is case-insensitive and never fails: unknown keys become
/// [`IllustrationStyle::Custom`].
///
/// # Examples
///
/// ```
/// use storyloom_core::IllustrationStyle;
///
/// let style: IllustrationStyle = "Art Deco".parse().unwrap();
/// assert_eq!(style, IllustrationStyle::ArtDeco);
/// assert_eq!(style.key(), "art deco");
///
/// let custom: IllustrationStyle = "ukiyo-e".parse().unwrap();
/// assert_eq!(custom.phrase(), "A digital painting in the style of ukiyo-e, depicting");
/// ```
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum IllustrationStyle {
    /// High-detail 3D render
    #[strum(serialize = "3d")]
    ThreeD,
    /// Anime illustration
    #[strum(serialize = "anime")]
    Anime,
    /// Layered paper cut-out
    #[strum(serialize = "paper")]
    Paper,
    /// Storybook illustration
    #[default]
    #[strum(serialize = "illustrated")]
    Illustrated,
    /// Geometric low-poly
    #[strum(serialize = "low-poly")]
    LowPoly,
    /// Watercolour painting
    #[strum(serialize = "watercolour", serialize = "watercolor")]
    Watercolour,
    /// Cartoon drawing
    #[strum(serialize = "cartoon")]
    Cartoon,
    /// Gothic and moody
    #[strum(serialize = "goth")]
    Goth,
    /// Art Deco geometry
    #[strum(serialize = "art deco")]
    ArtDeco,
    /// Cinematic shot
    #[strum(serialize = "cinema")]
    Cinema,
    /// Photorealistic
    #[strum(serialize = "realistic")]
    Realistic,
    /// Neon glow
    #[strum(serialize = "glowly")]
    Glowly,
    /// Candy-themed
    #[strum(serialize = "sweets")]
    Sweets,
    /// Soft fantasy
    #[strum(serialize = "dreamy")]
    Dreamy,
    /// Shadowy
    #[strum(serialize = "dark")]
    Dark,
    /// Golden-hour light
    #[strum(serialize = "sunset")]
    Sunset,
    /// Bright and cheerful
    #[strum(serialize = "bright")]
    Bright,
    /// Cool tones
    #[strum(serialize = "cool")]
    Cool,
    /// Pink hues
    #[strum(serialize = "pink")]
    Pink,
    /// Lavender hues
    #[strum(serialize = "lavender")]
    Lavender,
    /// Earthy palette
    #[strum(serialize = "earthy")]
    Earthy,
    /// Warm orange hues
    #[strum(serialize = "orange")]
    Orange,
    /// Any other key, rendered as a generic digital painting
    #[strum(default)]
    Custom(String),
}

impl IllustrationStyle {
    /// Every preset style, in menu order.
    pub const PRESETS: &'static [IllustrationStyle] = &[
        IllustrationStyle::ThreeD,
        IllustrationStyle::Anime,
        IllustrationStyle::Paper,
        IllustrationStyle::Illustrated,
        IllustrationStyle::LowPoly,
        IllustrationStyle::Watercolour,
        IllustrationStyle::Cartoon,
        IllustrationStyle::Goth,
        IllustrationStyle::ArtDeco,
        IllustrationStyle::Cinema,
        IllustrationStyle::Realistic,
        IllustrationStyle::Glowly,
        IllustrationStyle::Sweets,
        IllustrationStyle::Dreamy,
        IllustrationStyle::Dark,
        IllustrationStyle::Sunset,
        IllustrationStyle::Bright,
        IllustrationStyle::Cool,
        IllustrationStyle::Pink,
        IllustrationStyle::Lavender,
        IllustrationStyle::Earthy,
        IllustrationStyle::Orange,
    ];

    /// Canonical lookup key.
    pub fn key(&self) -> &str {
        match self {
            IllustrationStyle::ThreeD => "3d",
            IllustrationStyle::Anime => "anime",
            IllustrationStyle::Paper => "paper",
            IllustrationStyle::Illustrated => "illustrated",
            IllustrationStyle::LowPoly => "low-poly",
            IllustrationStyle::Watercolour => "watercolour",
            IllustrationStyle::Cartoon => "cartoon",
            IllustrationStyle::Goth => "goth",
            IllustrationStyle::ArtDeco => "art deco",
            IllustrationStyle::Cinema => "cinema",
            IllustrationStyle::Realistic => "realistic",
            IllustrationStyle::Glowly => "glowly",
            IllustrationStyle::Sweets => "sweets",
            IllustrationStyle::Dreamy => "dreamy",
            IllustrationStyle::Dark => "dark",
            IllustrationStyle::Sunset => "sunset",
            IllustrationStyle::Bright => "bright",
            IllustrationStyle::Cool => "cool",
            IllustrationStyle::Pink => "pink",
            IllustrationStyle::Lavender => "lavender",
            IllustrationStyle::Earthy => "earthy",
            IllustrationStyle::Orange => "orange",
            IllustrationStyle::Custom(key) => key,
        }
    }

    /// Prompt phrase placed before the visual prompt.
    pub fn phrase(&self) -> String {
        let phrase = match self {
            IllustrationStyle::ThreeD => "A cinematic, high-detail 3D render of",
            IllustrationStyle::Anime => "A vibrant, high-quality anime style illustration of",
            IllustrationStyle::Paper => "An intricate, multi-layered paper cut-out art style of",
            IllustrationStyle::Illustrated => {
                "A classic, beautifully detailed storybook illustration of"
            }
            IllustrationStyle::LowPoly => "A stylized, geometric low-poly art piece of",
            IllustrationStyle::Watercolour => "A beautiful, detailed watercolor painting of",
            IllustrationStyle::Cartoon => "A fun, expressive cartoon style drawing of",
            IllustrationStyle::Goth => "A dark, gothic, and moody illustration of",
            IllustrationStyle::ArtDeco => "An elegant, geometric Art Deco style representation of",
            IllustrationStyle::Cinema => "A dramatic, cinematic shot of",
            IllustrationStyle::Realistic => {
                "A photorealistic, high-detail, 8k resolution, cinematic photo of"
            }
            IllustrationStyle::Glowly => "A glowing, ethereal, neon-lit image of",
            IllustrationStyle::Sweets => {
                "A cute, candy-themed illustration of, with frosting and sprinkles, depicting"
            }
            IllustrationStyle::Dreamy => "A soft, ethereal, and dreamy fantasy illustration of",
            IllustrationStyle::Dark => "A dark, shadowy, and mysterious artwork of",
            IllustrationStyle::Sunset => {
                "A scene bathed in the warm, golden light of a sunset, showing"
            }
            IllustrationStyle::Bright => "A bright, vibrant, and cheerful illustration of",
            IllustrationStyle::Cool => {
                "A scene dominated by cool tones (blues, greens, purples) of"
            }
            IllustrationStyle::Pink => "A scene dominated by pink hues, showing",
            IllustrationStyle::Lavender => "A scene dominated by lavender and purple hues, showing",
            IllustrationStyle::Earthy => {
                "A scene with a natural, earthy color palette (browns, greens, ochre) of"
            }
            IllustrationStyle::Orange => "A scene dominated by warm orange and yellow hues, showing",
            IllustrationStyle::Custom(key) => {
                return format!("A digital painting in the style of {key}, depicting");
            }
        };
        phrase.to_string()
    }

    /// Full image prompt for a visual scene description.
    pub fn prompt_for(&self, visual_prompt: &str) -> String {
        format!("{}: {}", self.phrase(), visual_prompt)
    }
}

impl std::fmt::Display for IllustrationStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
