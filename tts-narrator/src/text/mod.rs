//! Text processing for TTS: sentence splitting and chunk shaping.

pub mod chunker;
pub mod shaper;
pub mod splitter;

pub use chunker::{chunk_text, process_text};
pub use shaper::{ChunkLimits, char_len};

/// A chunk of text ready for one synthesis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// Position in the narration; defines audio order
    pub index: usize,
    /// The text content
    pub text: String,
}

impl TextChunk {
    /// Create a new text chunk.
    pub fn new(index: usize, text: String) -> Self {
        Self { index, text }
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        char_len(&self.text)
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The first `max` characters, with `...` appended when cut.
    pub fn preview(&self, max: usize) -> String {
        truncate(&self.text, max)
    }
}

/// Cut `text` to `max` characters, appending `...` when anything was dropped.
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_chunk_creation() {
        let chunk = TextChunk::new(1, "Hello world".to_string());
        assert_eq!(chunk.index, 1);
        assert_eq!(chunk.text, "Hello world");
        assert_eq!(chunk.len(), 11);
    }

    #[test]
    fn test_preview() {
        let chunk = TextChunk::new(0, "abcdefghij".to_string());
        assert_eq!(chunk.preview(4), "abcd...");
        assert_eq!(chunk.preview(10), "abcdefghij");
        assert_eq!(chunk.preview(60), "abcdefghij");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("héllo", 2), "hé...");
    }
}
