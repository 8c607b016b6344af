//! Narration run data types.

use std::path::Path;
use std::time::Duration;

use speech_client::{DEFAULT_SPEED, DEFAULT_TEMPERATURE, SynthesisRequest};
use tokio::io::AsyncWriteExt;

use crate::audio::AudioFormat;
use crate::error::ChunkError;
use crate::text::TextChunk;

/// Characters of chunk text kept for reports.
pub const PREVIEW_CHARS: usize = 60;

/// Default silence between chunks, in seconds.
pub const DEFAULT_GAP_SECS: f64 = 0.4;

/// Voice parameters and pacing shared by every chunk of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrationSettings {
    /// Voice preset name
    pub voice: Option<String>,
    /// Seed for deterministic output
    pub seed: Option<i64>,
    pub temperature: f32,
    pub speed: f32,
    /// Silence inserted between chunks (0 disables)
    pub gap_secs: f64,
}

impl Default for NarrationSettings {
    fn default() -> Self {
        Self {
            voice: None,
            seed: None,
            temperature: DEFAULT_TEMPERATURE,
            speed: DEFAULT_SPEED,
            gap_secs: DEFAULT_GAP_SECS,
        }
    }
}

impl NarrationSettings {
    /// Build the synthesis request for one chunk.
    pub fn request_for(&self, text: &str) -> SynthesisRequest {
        SynthesisRequest::new(text)
            .with_voice(self.voice.clone())
            .with_seed(self.seed)
            .with_temperature(self.temperature)
            .with_speed(self.speed)
    }
}

/// Where a chunk is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkState {
    Pending,
    Synthesizing,
    Accepted,
    Rejected,
}

impl ChunkState {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }
}

/// What happened to one chunk.
#[derive(Debug, Clone)]
pub struct ChunkOutcome {
    /// Chunk position in the narration
    pub index: usize,
    /// Truncated chunk text
    pub preview: String,
    pub state: ChunkState,
    /// Seconds of speech produced (0 unless accepted)
    pub audio_secs: f64,
    /// Wall-clock time spent on the synthesis call
    pub elapsed: Duration,
    /// Rejection cause
    pub error: Option<String>,
}

impl ChunkOutcome {
    /// Create a pending outcome for a chunk.
    pub fn pending(chunk: &TextChunk) -> Self {
        Self {
            index: chunk.index,
            preview: chunk.preview(PREVIEW_CHARS),
            state: ChunkState::Pending,
            audio_secs: 0.0,
            elapsed: Duration::ZERO,
            error: None,
        }
    }

    pub fn mark_synthesizing(&mut self) {
        self.state = ChunkState::Synthesizing;
    }

    pub fn mark_accepted(&mut self, audio_secs: f64, elapsed: Duration) {
        self.state = ChunkState::Accepted;
        self.audio_secs = audio_secs;
        self.elapsed = elapsed;
        self.error = None;
    }

    pub fn mark_rejected(&mut self, error: &ChunkError, elapsed: Duration) {
        self.state = ChunkState::Rejected;
        self.elapsed = elapsed;
        self.error = Some(error.to_string());
    }
}

/// Snapshot handed to progress callbacks.
#[derive(Debug)]
pub struct NarrationProgress<'a> {
    pub total: usize,
    /// Chunks resolved so far
    pub completed: usize,
    pub accepted: usize,
    pub rejected: usize,
    /// The chunk that just changed state
    pub outcome: &'a ChunkOutcome,
}

/// A finished narration.
#[derive(Debug)]
pub struct Narration {
    /// Complete WAV file: header plus all accepted PCM and gaps
    pub wav: Vec<u8>,
    /// Format locked from the first accepted chunk
    pub format: AudioFormat,
    /// Speech plus gap seconds
    pub total_duration_secs: f64,
    pub chunk_count: usize,
    pub accepted: usize,
    pub rejected: usize,
    /// Wall-clock time for the whole synthesis loop
    pub synthesis_time: Duration,
    pub outcomes: Vec<ChunkOutcome>,
}

impl Narration {
    /// Synthesis time over audio duration; below 1.0 is faster than realtime.
    pub fn realtime_factor(&self) -> f64 {
        if self.total_duration_secs > 0.0 {
            self.synthesis_time.as_secs_f64() / self.total_duration_secs
        } else {
            0.0
        }
    }

    /// Write the WAV buffer to `path` in one pass.
    pub async fn write_to(&self, path: &Path) -> std::io::Result<()> {
        let mut file = tokio::fs::File::create(path).await?;
        file.write_all(&self.wav).await?;
        file.flush().await?;
        Ok(())
    }
}
