//! Text chunking for TTS processing.

use super::TextChunk;
use super::shaper::{ChunkLimits, shape};
use super::splitter::split_sentences;

/// Split text into synthesis-ready chunks.
///
/// # Arguments
/// * `text` - The text to chunk
/// * `limits` - Merge below `min_chars`, clause-split above `max_chars`
///
/// # Returns
/// Chunks in reading order, none empty.
pub fn chunk_text(text: &str, limits: ChunkLimits) -> Vec<String> {
    let sentences = split_sentences(text);
    shape(&sentences, limits)
}

/// Process input text into indexed chunks.
pub fn process_text(text: &str, limits: ChunkLimits) -> Vec<TextChunk> {
    chunk_text(text, limits)
        .into_iter()
        .enumerate()
        .map(|(index, text)| TextChunk::new(index, text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_short_text() {
        let text = "Hello world. How are you?";
        let chunks = chunk_text(text, ChunkLimits::default());
        assert_eq!(chunks, vec!["Hello world. How are you?"]);
    }

    #[test]
    fn test_chunk_empty_text() {
        assert!(chunk_text("", ChunkLimits::default()).is_empty());
    }

    #[test]
    fn test_chunk_whitespace_only() {
        assert!(chunk_text("   \n\n   ", ChunkLimits::default()).is_empty());
    }

    #[test]
    fn test_chunk_long_text() {
        let text = "First sentence is here. Second sentence is here. Third sentence is here. Fourth sentence is here.";
        let chunks = chunk_text(text, ChunkLimits::new(30, 100));
        assert_eq!(
            chunks,
            vec![
                "First sentence is here. Second sentence is here.",
                "Third sentence is here. Fourth sentence is here."
            ]
        );
    }

    #[test]
    fn test_process_text_indexes_in_order() {
        let text = "First sentence is here. Second sentence is here. Third sentence is here.";
        let chunks = process_text(text, ChunkLimits::new(10, 100));
        assert_eq!(chunks.len(), 3);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
        assert_eq!(chunks[2].text, "Third sentence is here.");
    }
}
