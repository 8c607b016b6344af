//! HTTP provider for OpenAI-style speech servers
//!
//! Speaks the `/v1/audio/speech` dialect served by local inference servers:
//! a JSON body in, a WAV payload out.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{Result, SpeechError};
use crate::provider::{SpeechProvider, SynthesisRequest};

/// Base address used when none is configured.
pub const DEFAULT_SERVER: &str = "http://localhost:8090";

/// Upper bound for a single synthesis call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

const SPEECH_PATH: &str = "/v1/audio/speech";
const HEALTH_PATH: &str = "/health";
const HEALTH_TIMEOUT_SECS: u64 = 5;

/// Provider that posts synthesis requests to an HTTP server
pub struct HttpSpeechProvider {
    base_url: String,
    timeout_secs: u64,
    client: Client,
}

impl HttpSpeechProvider {
    /// Create a provider for the server at `base_url`
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SpeechError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transport_error(&self, url: &str, err: reqwest::Error) -> SpeechError {
        if err.is_timeout() {
            SpeechError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else if err.is_connect() {
            SpeechError::ServiceUnreachable {
                url: url.to_string(),
                message: err.to_string(),
            }
        } else {
            SpeechError::Request(err.to_string())
        }
    }
}

// Error bodies seen in the wild: {"error": {"message": ..}}, {"error": ".."}
// and FastAPI's {"detail": ".."}.

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorResponse {
    Nested { error: ErrorDetail },
    Flat { error: String },
    Detail { detail: String },
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

fn error_message(body: String) -> String {
    match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(ErrorResponse::Nested { error }) => error.message,
        Ok(ErrorResponse::Flat { error }) => error,
        Ok(ErrorResponse::Detail { detail }) => detail,
        Err(_) => body,
    }
}

#[async_trait]
impl SpeechProvider for HttpSpeechProvider {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>> {
        let url = format!("{}{}", self.base_url, SPEECH_PATH);
        debug!("POST {} ({} chars)", url, request.text.chars().count());

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request.payload())
            .send()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SpeechError::ApiError {
                message: error_message(error_text),
                status_code: Some(status.as_u16()),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        if body.is_empty() {
            return Err(SpeechError::InvalidResponse("empty audio body".to_string()));
        }

        debug!("received {} bytes of audio", body.len());
        Ok(body.to_vec())
    }

    async fn health(&self) -> Result<()> {
        let url = format!("{}{}", self.base_url, HEALTH_PATH);

        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(HEALTH_TIMEOUT_SECS))
            .send()
            .await
            .map_err(|e| SpeechError::ServiceUnreachable {
                url: self.base_url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::ServiceUnreachable {
                url: self.base_url.clone(),
                message: format!("health check returned HTTP {}", status.as_u16()),
            });
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let provider = HttpSpeechProvider::new("http://localhost:8090/", DEFAULT_TIMEOUT_SECS).unwrap();
        assert_eq!(provider.base_url(), "http://localhost:8090");
    }

    #[test]
    fn test_error_message_shapes() {
        assert_eq!(
            error_message(r#"{"error": {"message": "no model"}}"#.to_string()),
            "no model"
        );
        assert_eq!(error_message(r#"{"error": "busy"}"#.to_string()), "busy");
        assert_eq!(error_message(r#"{"detail": "bad voice"}"#.to_string()), "bad voice");
        assert_eq!(error_message("plain text".to_string()), "plain text");
    }

    #[tokio::test]
    async fn test_synthesize_posts_payload_and_returns_bytes() {
        let server = MockServer::start().await;
        let wav = b"RIFF....WAVE".to_vec();

        Mock::given(method("POST"))
            .and(path("/v1/audio/speech"))
            .and(body_json(json!({ "input": "Hello.", "voice": "cylon", "seed": 7 })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(wav.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let provider = HttpSpeechProvider::new(&server.uri(), 10).unwrap();
        let request = SynthesisRequest::new("Hello.")
            .with_voice(Some("cylon".to_string()))
            .with_seed(Some(7));

        let bytes = provider.synthesize(&request).await.unwrap();
        assert_eq!(bytes, wav);
    }

    #[tokio::test]
    async fn test_synthesize_maps_service_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/audio/speech"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({ "error": { "message": "model not loaded" } })),
            )
            .mount(&server)
            .await;

        let provider = HttpSpeechProvider::new(&server.uri(), 10).unwrap();
        let err = provider
            .synthesize(&SynthesisRequest::new("Hello."))
            .await
            .unwrap_err();

        match err {
            SpeechError::ApiError {
                message,
                status_code,
            } => {
                assert_eq!(message, "model not loaded");
                assert_eq!(status_code, Some(500));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_synthesize_rejects_empty_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/audio/speech"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let provider = HttpSpeechProvider::new(&server.uri(), 10).unwrap();
        let err = provider
            .synthesize(&SynthesisRequest::new("Hello."))
            .await
            .unwrap_err();
        assert!(matches!(err, SpeechError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_health_ok() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let provider = HttpSpeechProvider::new(&server.uri(), 10).unwrap();
        assert!(provider.health().await.is_ok());
    }

    #[tokio::test]
    async fn test_health_fails_on_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let provider = HttpSpeechProvider::new(&server.uri(), 10).unwrap();
        let err = provider.health().await.unwrap_err();
        assert!(matches!(err, SpeechError::ServiceUnreachable { .. }));
    }
}
