//! WAV (RIFF/WAVE) container parsing and writing for PCM audio.
//!
//! Parsing walks the RIFF sub-chunks instead of trusting fixed offsets, so
//! servers that emit `LIST` or `fact` chunks before `data` still parse.
//! Writing always produces the canonical 44-byte PCM header.

use std::fmt;

use thiserror::Error;

/// Size of the canonical PCM WAV header.
pub const HEADER_SIZE: usize = 44;

const RIFF_HEADER_SIZE: usize = 12;
const CHUNK_HEADER_SIZE: usize = 8;
const FMT_MIN_SIZE: usize = 16;
const PCM_FORMAT_TAG: u16 = 1;

/// Errors from reading or writing a WAV buffer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WavError {
    #[error("not a RIFF file")]
    NotRiff,

    #[error("RIFF file is not WAVE")]
    NotWave,

    #[error("no fmt chunk before the data chunk")]
    MissingFmt,

    #[error("no data chunk")]
    MissingData,

    #[error("{chunk} chunk truncated at byte {offset}")]
    Truncated { chunk: String, offset: usize },

    #[error("invalid audio format: {0}")]
    InvalidFormat(String),

    #[error("PCM payload of {size} bytes does not fit in a WAV file")]
    TooLarge { size: usize },
}

/// Sample layout shared by every segment of a narration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub channels: u16,
}

impl AudioFormat {
    pub fn new(sample_rate: u32, bits_per_sample: u16, channels: u16) -> Self {
        Self {
            sample_rate,
            bits_per_sample,
            channels,
        }
    }

    /// Bytes per sample frame (all channels). Fits 16 bits for any
    /// format that passed validation.
    pub fn block_align(&self) -> u16 {
        self.frame_bytes() as u16
    }

    /// Fits 32 bits for any format that passed validation.
    pub fn byte_rate(&self) -> u32 {
        self.bytes_per_second() as u32
    }

    fn frame_bytes(&self) -> u32 {
        u32::from(self.channels) * u32::from(self.bits_per_sample) / 8
    }

    fn bytes_per_second(&self) -> u64 {
        u64::from(self.sample_rate) * u64::from(self.channels) * u64::from(self.bits_per_sample) / 8
    }

    /// Seconds of audio held in `bytes` of PCM.
    pub fn duration_secs(&self, bytes: usize) -> f64 {
        match self.bytes_per_second() {
            0 => 0.0,
            rate => bytes as f64 / rate as f64,
        }
    }

    fn validate(&self) -> Result<(), WavError> {
        if self.sample_rate == 0 {
            return Err(WavError::InvalidFormat("sample rate is zero".to_string()));
        }
        if self.channels == 0 {
            return Err(WavError::InvalidFormat("channel count is zero".to_string()));
        }
        if self.bits_per_sample == 0 || self.bits_per_sample % 8 != 0 {
            return Err(WavError::InvalidFormat(format!(
                "unsupported bit depth {}",
                self.bits_per_sample
            )));
        }
        if u16::try_from(self.frame_bytes()).is_err() {
            return Err(WavError::InvalidFormat(format!(
                "{} channels of {}-bit samples overflow the block align field",
                self.channels, self.bits_per_sample
            )));
        }
        if u32::try_from(self.bytes_per_second()).is_err() {
            return Err(WavError::InvalidFormat(format!(
                "{} overflows the byte rate field",
                self
            )));
        }
        Ok(())
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Hz/{}-bit/{}ch",
            self.sample_rate, self.bits_per_sample, self.channels
        )
    }
}

/// A parsed WAV buffer: its format and a view of the PCM payload.
#[derive(Debug, PartialEq, Eq)]
pub struct WavAudio<'a> {
    pub format: AudioFormat,
    pub pcm: &'a [u8],
}

/// Parse a WAV buffer into its format and PCM payload.
///
/// A `data` chunk that claims more bytes than the buffer holds yields what
/// is there; streaming servers often write a placeholder size.
pub fn parse_wav(bytes: &[u8]) -> Result<WavAudio<'_>, WavError> {
    if bytes.len() < RIFF_HEADER_SIZE || &bytes[0..4] != b"RIFF" {
        return Err(WavError::NotRiff);
    }
    if &bytes[8..12] != b"WAVE" {
        return Err(WavError::NotWave);
    }

    let mut format = None;
    let mut offset = RIFF_HEADER_SIZE;

    while offset + CHUNK_HEADER_SIZE <= bytes.len() {
        let id = &bytes[offset..offset + 4];
        let size = read_u32(bytes, offset + 4) as usize;
        let body_start = offset + CHUNK_HEADER_SIZE;

        match id {
            b"fmt " => {
                if size < FMT_MIN_SIZE || body_start + FMT_MIN_SIZE > bytes.len() {
                    return Err(WavError::Truncated {
                        chunk: "fmt".to_string(),
                        offset,
                    });
                }
                format = Some(AudioFormat {
                    channels: read_u16(bytes, body_start + 2),
                    sample_rate: read_u32(bytes, body_start + 4),
                    bits_per_sample: read_u16(bytes, body_start + 14),
                });
            }
            b"data" => {
                let format = format.ok_or(WavError::MissingFmt)?;
                format.validate()?;
                let end = body_start.saturating_add(size).min(bytes.len());
                return Ok(WavAudio {
                    format,
                    pcm: &bytes[body_start..end],
                });
            }
            _ => {}
        }

        // Chunks are word aligned
        offset = body_start
            .saturating_add(size)
            .saturating_add(size & 1);
    }

    Err(WavError::MissingData)
}

/// Build the canonical 44-byte PCM header for `data_size` bytes of audio.
pub fn build_header(format: AudioFormat, data_size: u32) -> [u8; HEADER_SIZE] {
    let mut header = [0u8; HEADER_SIZE];

    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&(36u32.wrapping_add(data_size)).to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&PCM_FORMAT_TAG.to_le_bytes());
    header[22..24].copy_from_slice(&format.channels.to_le_bytes());
    header[24..28].copy_from_slice(&format.sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&format.byte_rate().to_le_bytes());
    header[32..34].copy_from_slice(&format.block_align().to_le_bytes());
    header[34..36].copy_from_slice(&format.bits_per_sample.to_le_bytes());

    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_size.to_le_bytes());

    header
}

/// Check that `len` bytes of PCM fit the 32-bit RIFF size fields.
pub fn data_size(len: usize) -> Result<u32, WavError> {
    u32::try_from(len)
        .ok()
        .filter(|size| size.checked_add(36).is_some())
        .ok_or(WavError::TooLarge { size: len })
}

/// Wrap a PCM payload in a canonical WAV container.
pub fn encode_wav(format: AudioFormat, pcm: &[u8]) -> Result<Vec<u8>, WavError> {
    let data_size = data_size(pcm.len())?;

    let mut wav = Vec::with_capacity(HEADER_SIZE + pcm.len());
    wav.extend_from_slice(&build_header(format, data_size));
    wav.extend_from_slice(pcm);
    Ok(wav)
}

/// Zeroed PCM covering `duration_secs` of audio in `format`.
///
/// Always zero bytes, whatever the bit depth. For 8-bit unsigned PCM the
/// midpoint is 0x80, so a gap there is a DC offset rather than silence.
pub fn make_silence(format: AudioFormat, duration_secs: f64) -> Vec<u8> {
    if duration_secs <= 0.0 {
        return Vec::new();
    }
    let frames = (f64::from(format.sample_rate) * duration_secs).floor() as usize;
    let bytes_per_sample = usize::from(format.bits_per_sample / 8);
    vec![0u8; frames * usize::from(format.channels) * bytes_per_sample]
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
