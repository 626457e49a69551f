//! Per-generation state and asset caches.

use crate::CancellationFlag;
use std::collections::HashMap;
use storyloom_core::{
    AudioAsset, IllustrationAsset, LengthTier, ProgressUpdate, StoryMetadata, StorySegment,
};
use storyloom_error::{PipelineError, PipelineErrorKind, StoryloomResult};

/// Synthesized assets keyed by segment index, plus preview caches.
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    audio: HashMap<usize, AudioAsset>,
    illustrations: HashMap<usize, IllustrationAsset>,
    voice_previews: HashMap<String, AudioAsset>,
    style_previews: HashMap<String, IllustrationAsset>,
}

impl AssetStore {
    /// Narration for segment `index`.
    pub fn audio(&self, index: usize) -> Option<&AudioAsset> {
        self.audio.get(&index)
    }

    /// Store narration for segment `index`, replacing any previous asset.
    pub fn insert_audio(&mut self, index: usize, asset: AudioAsset) {
        self.audio.insert(index, asset);
    }

    /// Illustration for segment `index`.
    pub fn illustration(&self, index: usize) -> Option<&IllustrationAsset> {
        self.illustrations.get(&index)
    }

    /// Store the illustration for segment `index`, replacing any previous asset.
    pub fn insert_illustration(&mut self, index: usize, asset: IllustrationAsset) {
        self.illustrations.insert(index, asset);
    }

    /// Cached preview for a voice name.
    pub fn voice_preview(&self, voice: &str) -> Option<&AudioAsset> {
        self.voice_previews.get(voice)
    }

    /// Cache a voice preview.
    pub fn insert_voice_preview(&mut self, voice: impl Into<String>, asset: AudioAsset) {
        self.voice_previews.insert(voice.into(), asset);
    }

    /// Cached preview for a style key.
    pub fn style_preview(&self, style: &str) -> Option<&IllustrationAsset> {
        self.style_previews.get(style)
    }

    /// Cache a style preview.
    pub fn insert_style_preview(&mut self, style: impl Into<String>, asset: IllustrationAsset) {
        self.style_previews.insert(style.into(), asset);
    }

    /// Segment indices with narration, ascending.
    pub fn audio_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.audio.keys().copied().collect();
        indices.sort_unstable();
        indices
    }

    /// Segment indices with an illustration, ascending.
    pub fn illustration_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.illustrations.keys().copied().collect();
        indices.sort_unstable();
        indices
    }
}

/// One story generation: prompt, finalized text, progress and assets.
///
/// The story text is append-only and always equals the ordered concatenation
/// of the segment texts. Progress never decreases.
///
/// # Examples
///
/// ```
/// use storyloom_core::LengthTier;
/// use storyloom_pipeline::GenerationSession;
///
/// let session = GenerationSession::new("a lighthouse keeper", LengthTier::VeryShort);
/// assert!(session.text().is_empty());
/// assert_eq!(session.progress(), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct GenerationSession {
    prompt: String,
    tier: LengthTier,
    segments: Vec<StorySegment>,
    text: String,
    progress: f64,
    metadata: Option<StoryMetadata>,
    cancel: CancellationFlag,
    assets: AssetStore,
}

impl GenerationSession {
    /// Start a session for `prompt` at the given length tier.
    pub fn new(prompt: impl Into<String>, tier: LengthTier) -> Self {
        Self {
            prompt: prompt.into(),
            tier,
            segments: Vec::new(),
            text: String::new(),
            progress: 0.0,
            metadata: None,
            cancel: CancellationFlag::new(),
            assets: AssetStore::default(),
        }
    }

    /// Share an externally owned cancellation flag.
    pub fn with_cancellation(mut self, cancel: CancellationFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// The user's story idea.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Selected length tier.
    pub fn tier(&self) -> LengthTier {
        self.tier
    }

    /// Finalized segments in order.
    pub fn segments(&self) -> &[StorySegment] {
        &self.segments
    }

    /// Segment `index`.
    ///
    /// # Errors
    ///
    /// Returns `SegmentOutOfRange` for an index past the last segment.
    pub fn segment(&self, index: usize) -> StoryloomResult<&StorySegment> {
        self.segments.get(index).ok_or_else(|| {
            PipelineError::new(PipelineErrorKind::SegmentOutOfRange {
                index,
                len: self.segments.len(),
            })
            .into()
        })
    }

    /// The whole story so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Last reported completion percentage.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Story metadata, once generated.
    pub fn metadata(&self) -> Option<&StoryMetadata> {
        self.metadata.as_ref()
    }

    /// Cancellation flag polled by every pipeline working on this session.
    pub fn cancellation(&self) -> &CancellationFlag {
        &self.cancel
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cached assets.
    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Cached assets, mutably.
    pub fn assets_mut(&mut self) -> &mut AssetStore {
        &mut self.assets
    }

    pub(crate) fn append_segment(&mut self, text: String, char_budget: usize) -> &StorySegment {
        self.text.push_str(&text);
        let index = self.segments.len();
        self.segments.push(StorySegment::new(index, text, char_budget));
        &self.segments[index]
    }

    pub(crate) fn set_metadata(&mut self, metadata: Option<StoryMetadata>) {
        self.metadata = metadata;
    }

    /// Record `update`'s percentage, clamped so progress never goes backwards.
    pub(crate) fn advance(&mut self, mut update: ProgressUpdate) -> ProgressUpdate {
        self.progress = self.progress.max(update.percentage.clamp(0.0, 100.0));
        update.percentage = self.progress;
        update
    }
}
