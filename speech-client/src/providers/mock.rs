//! Mock speech provider for testing
//!
//! Replays a script of canned replies, one per call, so callers can
//! simulate service errors and odd audio responses chunk by chunk.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Result, SpeechError};
use crate::provider::{SpeechProvider, SynthesisRequest};

/// One canned reply
#[derive(Debug)]
pub enum MockReply {
    Audio(Vec<u8>),
    Fail(SpeechError),
}

/// A mock provider that answers calls from a script
pub struct MockProvider {
    /// Replies consumed in call order
    script: Mutex<VecDeque<MockReply>>,
    /// Audio returned once the script runs dry
    fallback: Option<Vec<u8>>,
    /// Error returned once the script runs dry
    fallback_error: Option<SpeechError>,
    /// Whether health checks pass
    healthy: bool,
    /// Current call count
    call_count: AtomicUsize,
    /// Every request received, in order
    requests: Mutex<Vec<SynthesisRequest>>,
}

impl MockProvider {
    /// Create a provider that replies from `script`, failing once it is exhausted
    pub fn scripted(script: Vec<MockReply>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: None,
            fallback_error: None,
            healthy: true,
            call_count: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a provider that always returns the same audio
    pub fn always_succeeds(audio: Vec<u8>) -> Self {
        Self {
            fallback: Some(audio),
            ..Self::scripted(Vec::new())
        }
    }

    /// Create a provider that always fails with the given error
    pub fn always_fails(error: SpeechError) -> Self {
        Self {
            fallback_error: Some(error),
            ..Self::scripted(Vec::new())
        }
    }

    /// Make health checks fail
    pub fn unhealthy(mut self) -> Self {
        self.healthy = false;
        self
    }

    /// Get the number of times synthesize() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<SynthesisRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechProvider for MockProvider {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        let mut script = self.script.lock().unwrap();
        match script.pop_front() {
            Some(MockReply::Audio(audio)) => Ok(audio),
            Some(MockReply::Fail(err)) => Err(err),
            None => match (&self.fallback, &self.fallback_error) {
                (Some(audio), _) => Ok(audio.clone()),
                (None, Some(err)) => Err(clone_error(err)),
                (None, None) => Err(SpeechError::Request("mock script exhausted".to_string())),
            },
        }
    }

    async fn health(&self) -> Result<()> {
        if self.healthy {
            Ok(())
        } else {
            Err(SpeechError::ServiceUnreachable {
                url: "mock://".to_string(),
                message: "mock server down".to_string(),
            })
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Clone a SpeechError (needed because SpeechError doesn't implement Clone)
fn clone_error(err: &SpeechError) -> SpeechError {
    match err {
        SpeechError::ServiceUnreachable { url, message } => SpeechError::ServiceUnreachable {
            url: url.clone(),
            message: message.clone(),
        },
        SpeechError::Timeout { timeout_secs } => SpeechError::Timeout {
            timeout_secs: *timeout_secs,
        },
        SpeechError::Request(s) => SpeechError::Request(s.clone()),
        SpeechError::ApiError {
            message,
            status_code,
        } => SpeechError::ApiError {
            message: message.clone(),
            status_code: *status_code,
        },
        SpeechError::InvalidResponse(s) => SpeechError::InvalidResponse(s.clone()),
        SpeechError::ConfigError(s) => SpeechError::ConfigError(s.clone()),
    }
}
