//! Text-to-speech client for tts-narrator
//!
//! Provides a single interface over speech synthesis backends:
//! - HTTP servers speaking the OpenAI-style `/v1/audio/speech` API
//! - A scripted mock for tests

pub mod error;
pub mod provider;
pub mod providers;

pub use error::{Result, SpeechError};
pub use provider::{DEFAULT_SPEED, DEFAULT_TEMPERATURE, SpeechPayload, SpeechProvider, SynthesisRequest};
pub use providers::{
    DEFAULT_SERVER, DEFAULT_TIMEOUT_SECS, HttpSpeechProvider, MockProvider, MockReply,
    get_provider,
};
