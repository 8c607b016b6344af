use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

/// Sampling temperature the server assumes when none is sent.
pub const DEFAULT_TEMPERATURE: f32 = 0.9;

/// Playback speed the server assumes when none is sent.
pub const DEFAULT_SPEED: f32 = 1.0;

/// One chunk of text to synthesize, plus voice parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice: Option<String>,
    pub seed: Option<i64>,
    pub temperature: f32,
    pub speed: f32,
}

impl SynthesisRequest {
    /// Create a request with default voice parameters
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: None,
            seed: None,
            temperature: DEFAULT_TEMPERATURE,
            speed: DEFAULT_SPEED,
        }
    }

    pub fn with_voice(mut self, voice: Option<String>) -> Self {
        self.voice = voice;
        self
    }

    pub fn with_seed(mut self, seed: Option<i64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Wire body for the speech endpoint. Fields left at their server
    /// defaults are omitted.
    pub fn payload(&self) -> SpeechPayload<'_> {
        SpeechPayload {
            input: &self.text,
            voice: self.voice.as_deref().filter(|v| !v.is_empty()),
            seed: self.seed,
            temperature: (self.temperature != DEFAULT_TEMPERATURE).then_some(self.temperature),
            speed: (self.speed != DEFAULT_SPEED).then_some(self.speed),
        }
    }
}

/// JSON body posted to `/v1/audio/speech`
#[derive(Debug, Serialize)]
pub struct SpeechPayload<'a> {
    pub input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
}

/// Trait for text-to-speech services
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Synthesize one chunk and return the raw WAV bytes
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>>;

    /// Check that the service is up and answering
    async fn health(&self) -> Result<()>;

    /// Get the provider name for display
    fn name(&self) -> &'static str;
}
