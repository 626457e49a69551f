//! Canonical 44-byte PCM WAV container.

use storyloom_core::{AudioAsset, AudioFormat};
use storyloom_error::{PipelineError, PipelineErrorKind, StoryloomResult};

/// Size of the header written by [`wrap_pcm`].
pub const WAV_HEADER_LEN: usize = 44;

const PCM_FORMAT_TAG: u16 = 1;
const FMT_CHUNK_LEN: u32 = 16;

/// Prefix raw PCM with a canonical WAV header.
///
/// # Examples
///
/// ```
/// use storyloom_pipeline::{WavHeader, wrap_pcm};
///
/// let wav = wrap_pcm(&[0, 0, 1, 0], 24_000, 1, 16);
/// assert_eq!(&wav[0..4], b"RIFF");
/// assert_eq!(wav.len(), 48);
///
/// let header = WavHeader::parse(&wav).unwrap();
/// assert_eq!(header.data_size, 4);
/// ```
pub fn wrap_pcm(pcm: &[u8], sample_rate: u32, channels: u16, bits_per_sample: u16) -> Vec<u8> {
    let format = AudioFormat {
        sample_rate,
        channels,
        bits_per_sample,
    };
    let data_size = pcm.len() as u32;

    let mut wav = Vec::with_capacity(WAV_HEADER_LEN + pcm.len());
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_size).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
    wav.extend_from_slice(&PCM_FORMAT_TAG.to_le_bytes());
    wav.extend_from_slice(&channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&format.byte_rate().to_le_bytes());
    wav.extend_from_slice(&format.block_align().to_le_bytes());
    wav.extend_from_slice(&bits_per_sample.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    wav.extend_from_slice(pcm);
    wav
}

/// Wrap an audio asset using its own format.
pub fn wrap_asset(asset: &AudioAsset) -> Vec<u8> {
    let format = asset.format();
    wrap_pcm(
        asset.pcm(),
        format.sample_rate,
        format.channels,
        format.bits_per_sample,
    )
}

/// Fields read back from a header written by [`wrap_pcm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    /// Sample layout
    pub format: AudioFormat,
    /// Declared byte rate
    pub byte_rate: u32,
    /// Declared block alignment
    pub block_align: u16,
    /// Payload length in bytes
    pub data_size: u32,
}

impl WavHeader {
    /// Parse the canonical 44-byte header.
    ///
    /// # Errors
    ///
    /// Returns `InvalidContainer` if the bytes are too short, a chunk tag is
    /// wrong, or the format is not uncompressed PCM.
    pub fn parse(bytes: &[u8]) -> StoryloomResult<Self> {
        let header = bytes.get(..WAV_HEADER_LEN).ok_or_else(|| {
            invalid(format!(
                "expected at least {} bytes, got {}",
                WAV_HEADER_LEN,
                bytes.len()
            ))
        })?;

        for (offset, tag) in [(0, b"RIFF"), (8, b"WAVE"), (12, b"fmt "), (36, b"data")] {
            if &header[offset..offset + 4] != tag {
                return Err(invalid(format!(
                    "missing {:?} tag at byte {}",
                    String::from_utf8_lossy(tag),
                    offset
                )));
            }
        }

        let format_tag = read_u16(header, 20);
        if format_tag != PCM_FORMAT_TAG {
            return Err(invalid(format!("unsupported format tag {}", format_tag)));
        }

        Ok(Self {
            format: AudioFormat {
                sample_rate: read_u32(header, 24),
                channels: read_u16(header, 22),
                bits_per_sample: read_u16(header, 34),
            },
            byte_rate: read_u32(header, 28),
            block_align: read_u16(header, 32),
            data_size: read_u32(header, 40),
        })
    }
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn invalid(message: String) -> storyloom_error::StoryloomError {
    PipelineError::new(PipelineErrorKind::InvalidContainer(message)).into()
}
