use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Speech server not reachable at {url}: {message}")]
    ServiceUnreachable { url: String, message: String },

    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    #[error("Request failed: {0}")]
    Request(String),

    #[error("API error{}: {message}", status_code.map(|c| format!(" (HTTP {})", c)).unwrap_or_default())]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, SpeechError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_with_status() {
        let err = SpeechError::ApiError {
            message: "voice not found".to_string(),
            status_code: Some(404),
        };
        assert_eq!(err.to_string(), "API error (HTTP 404): voice not found");
    }

    #[test]
    fn test_api_error_display_without_status() {
        let err = SpeechError::ApiError {
            message: "bad".to_string(),
            status_code: None,
        };
        assert_eq!(err.to_string(), "API error: bad");
    }
}
