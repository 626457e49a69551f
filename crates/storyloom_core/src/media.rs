//! Synthesized media assets.

use serde::{Deserialize, Serialize};

/// Raw PCM layout descriptor.
///
/// # Examples
///
/// ```
/// use storyloom_core::AudioFormat;
///
/// let format = AudioFormat::SPEECH;
/// assert_eq!(format.byte_rate(), 48_000);
/// assert_eq!(format.block_align(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioFormat {
    /// Samples per second
    pub sample_rate: u32,
    /// Interleaved channel count
    pub channels: u16,
    /// Bits per sample
    pub bits_per_sample: u16,
}

impl AudioFormat {
    /// The fixed output format of the speech endpoint: 24 kHz, mono, 16-bit signed LE.
    pub const SPEECH: AudioFormat = AudioFormat {
        sample_rate: 24_000,
        channels: 1,
        bits_per_sample: 16,
    };

    /// Bytes per second of audio.
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * u32::from(self.channels) * u32::from(self.bits_per_sample) / 8
    }

    /// Bytes per interleaved sample frame.
    pub fn block_align(&self) -> u16 {
        self.channels * self.bits_per_sample / 8
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self::SPEECH
    }
}

/// Narration audio for one segment.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct AudioAsset {
    /// Raw PCM bytes, always a whole number of samples
    pcm: Vec<u8>,
    /// Layout of `pcm`
    format: AudioFormat,
}

impl AudioAsset {
    /// Wrap speech-endpoint PCM, dropping a trailing partial sample if present.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyloom_core::AudioAsset;
    ///
    /// let asset = AudioAsset::speech(vec![1, 2, 3]);
    /// assert_eq!(asset.pcm(), &vec![1, 2]);
    /// ```
    pub fn speech(mut pcm: Vec<u8>) -> Self {
        let format = AudioFormat::SPEECH;
        let align = usize::from(format.block_align()).max(1);
        pcm.truncate(pcm.len() - pcm.len() % align);
        Self { pcm, format }
    }

    /// Playback length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.pcm.len() as f64 / f64::from(self.format.byte_rate())
    }

    /// Consume the asset, returning its PCM bytes.
    pub fn into_pcm(self) -> Vec<u8> {
        self.pcm
    }
}

/// Encoded illustration for one segment.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct IllustrationAsset {
    /// PNG bytes
    bytes: Vec<u8>,
    /// Style key the image was rendered with
    style: String,
}

impl IllustrationAsset {
    /// Create an asset from encoded image bytes and the style key used.
    pub fn new(bytes: Vec<u8>, style: impl Into<String>) -> Self {
        Self {
            bytes,
            style: style.into(),
        }
    }
}
