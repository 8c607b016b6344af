//! Speech provider implementations

mod http;
pub mod mock;

pub use http::{DEFAULT_SERVER, DEFAULT_TIMEOUT_SECS, HttpSpeechProvider};
pub use mock::{MockProvider, MockReply};

use crate::error::Result;
use crate::provider::SpeechProvider;

/// Create the provider for a server base address
pub fn get_provider(server: &str, timeout_secs: u64) -> Result<Box<dyn SpeechProvider>> {
    Ok(Box::new(HttpSpeechProvider::new(server, timeout_secs)?))
}
