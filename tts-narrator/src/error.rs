//! Error types for narration runs.

use speech_client::SpeechError;
use thiserror::Error;

use crate::audio::{AudioFormat, WavError};

/// Why a single chunk was rejected. Never fatal to the run.
#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("synthesis failed: {0}")]
    Transport(#[from] SpeechError),

    #[error("malformed audio: {0}")]
    Format(#[from] WavError),

    #[error("format mismatch ({found} vs {expected})")]
    FormatMismatch {
        expected: AudioFormat,
        found: AudioFormat,
    },
}

/// Errors that end a narration run.
#[derive(Debug, Error)]
pub enum NarrationError {
    #[error("{0}")]
    Input(String),

    #[error("server not reachable at {server}")]
    ServiceUnreachable {
        server: String,
        #[source]
        source: SpeechError,
    },

    #[error("no audio generated: all {chunks} chunks failed")]
    NoAudioGenerated { chunks: usize },

    #[error("failed to encode output: {0}")]
    Encode(#[from] WavError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mismatch_message() {
        let err = ChunkError::FormatMismatch {
            expected: AudioFormat::new(24000, 16, 1),
            found: AudioFormat::new(22050, 16, 1),
        };
        assert_eq!(
            err.to_string(),
            "format mismatch (22050 Hz/16-bit/1ch vs 24000 Hz/16-bit/1ch)"
        );
    }

    #[test]
    fn test_transport_wraps_speech_error() {
        let err: ChunkError = SpeechError::Timeout { timeout_secs: 300 }.into();
        assert_eq!(
            err.to_string(),
            "synthesis failed: Request timed out after 300 seconds"
        );
    }
}
