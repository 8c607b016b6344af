//! Narration orchestration.
//!
//! Chunks are synthesized strictly one after another. The first accepted
//! chunk locks the audio format; later chunks in any other format are
//! rejected. A failed chunk is reported and skipped, never fatal; only a
//! run where every chunk fails produces no output.

mod types;

pub use types::{
    ChunkOutcome, ChunkState, DEFAULT_GAP_SECS, Narration, NarrationProgress, NarrationSettings,
    PREVIEW_CHARS,
};

use std::path::Path;
use std::time::Instant;

use log::{debug, info, warn};
use speech_client::SpeechProvider;

use crate::audio::{AudioFormat, encode_wav, make_silence, parse_wav};
use crate::error::{ChunkError, NarrationError};
use crate::text::TextChunk;

/// Audio accepted from one chunk.
struct ChunkAudio {
    format: AudioFormat,
    pcm: Vec<u8>,
}

/// Drives synthesis for a list of chunks and assembles the result.
pub struct Narrator<'a> {
    provider: &'a dyn SpeechProvider,
    settings: NarrationSettings,
}

impl<'a> Narrator<'a> {
    pub fn new(provider: &'a dyn SpeechProvider, settings: NarrationSettings) -> Self {
        Self { provider, settings }
    }

    /// Fail fast when the speech service is down.
    pub async fn ensure_service_ready(&self, server: &str) -> Result<(), NarrationError> {
        self.provider
            .health()
            .await
            .map_err(|source| NarrationError::ServiceUnreachable {
                server: server.to_string(),
                source,
            })
    }

    /// Synthesize every chunk in order and assemble one WAV buffer.
    ///
    /// `on_progress` is called when a chunk starts synthesizing and again
    /// when it is accepted or rejected.
    pub async fn narrate<F>(
        &self,
        chunks: &[TextChunk],
        mut on_progress: F,
    ) -> Result<Narration, NarrationError>
    where
        F: FnMut(&NarrationProgress<'_>),
    {
        let total = chunks.len();
        let mut outcomes: Vec<ChunkOutcome> = chunks.iter().map(ChunkOutcome::pending).collect();
        let mut locked: Option<AudioFormat> = None;
        let mut segments: Vec<Vec<u8>> = Vec::new();
        let mut total_duration_secs = 0.0;
        let mut accepted = 0;
        let mut rejected = 0;
        let started = Instant::now();

        for (position, chunk) in chunks.iter().enumerate() {
            outcomes[position].mark_synthesizing();
            on_progress(&NarrationProgress {
                total,
                completed: accepted + rejected,
                accepted,
                rejected,
                outcome: &outcomes[position],
            });

            let chunk_started = Instant::now();
            let result = self.synthesize_chunk(chunk, locked).await;
            let elapsed = chunk_started.elapsed();

            match result {
                Ok(audio) => {
                    let format = *locked.get_or_insert(audio.format);
                    let audio_secs = format.duration_secs(audio.pcm.len());
                    segments.push(audio.pcm);
                    total_duration_secs += audio_secs;

                    let is_last = position + 1 == total;
                    if !is_last && self.settings.gap_secs > 0.0 {
                        segments.push(make_silence(format, self.settings.gap_secs));
                        total_duration_secs += self.settings.gap_secs;
                    }

                    accepted += 1;
                    outcomes[position].mark_accepted(audio_secs, elapsed);
                    debug!(
                        "[{}/{}] {:.1}s audio in {:.1}s: \"{}\"",
                        position + 1,
                        total,
                        audio_secs,
                        elapsed.as_secs_f64(),
                        outcomes[position].preview
                    );
                }
                Err(err) => {
                    rejected += 1;
                    warn!(
                        "[{}/{}] chunk {} rejected: {} (\"{}\")",
                        position + 1,
                        total,
                        chunk.index,
                        err,
                        outcomes[position].preview
                    );
                    outcomes[position].mark_rejected(&err, elapsed);
                }
            }

            on_progress(&NarrationProgress {
                total,
                completed: accepted + rejected,
                accepted,
                rejected,
                outcome: &outcomes[position],
            });
        }

        let Some(format) = locked else {
            return Err(NarrationError::NoAudioGenerated { chunks: total });
        };

        let wav = assemble(format, segments)?;
        info!(
            "assembled {} bytes of {} audio from {}/{} chunks",
            wav.len(),
            format,
            accepted,
            total
        );

        Ok(Narration {
            wav,
            format,
            total_duration_secs,
            chunk_count: total,
            accepted,
            rejected,
            synthesis_time: started.elapsed(),
            outcomes,
        })
    }

    /// Narrate and write the result to `output`. Nothing is written when
    /// no chunk produced audio.
    pub async fn narrate_to_file<F>(
        &self,
        chunks: &[TextChunk],
        output: &Path,
        on_progress: F,
    ) -> Result<Narration, NarrationError>
    where
        F: FnMut(&NarrationProgress<'_>),
    {
        let narration = self.narrate(chunks, on_progress).await?;
        narration.write_to(output).await?;
        Ok(narration)
    }

    async fn synthesize_chunk(
        &self,
        chunk: &TextChunk,
        locked: Option<AudioFormat>,
    ) -> Result<ChunkAudio, ChunkError> {
        let request = self.settings.request_for(&chunk.text);
        let wav = self.provider.synthesize(&request).await?;
        let parsed = parse_wav(&wav)?;

        if let Some(expected) = locked {
            if parsed.format != expected {
                return Err(ChunkError::FormatMismatch {
                    expected,
                    found: parsed.format,
                });
            }
        }

        Ok(ChunkAudio {
            format: parsed.format,
            pcm: parsed.pcm.to_vec(),
        })
    }
}

/// Join PCM segments in order behind a canonical header.
fn assemble(format: AudioFormat, segments: Vec<Vec<u8>>) -> Result<Vec<u8>, NarrationError> {
    Ok(encode_wav(format, &segments.concat())?)
}
