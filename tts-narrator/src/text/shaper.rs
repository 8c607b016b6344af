//! Shaping sentences into synthesis-sized chunks.

use once_cell::sync::Lazy;
use regex::Regex;

/// Default lower bound; a chunk shorter than this absorbs the next sentence.
pub const DEFAULT_MIN_CHARS: usize = 40;

/// Default upper bound; longer sentences are split on clause boundaries.
pub const DEFAULT_MAX_CHARS: usize = 300;

/// Clause delimiters: comma, semicolon or colon plus space, and a spaced double dash.
static CLAUSE_DELIMITER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s+|;\s+|:\s+|\s+--\s+").expect("valid regex"));

/// Size bounds for shaped chunks, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLimits {
    pub min_chars: usize,
    pub max_chars: usize,
}

impl Default for ChunkLimits {
    fn default() -> Self {
        Self {
            min_chars: DEFAULT_MIN_CHARS,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

impl ChunkLimits {
    pub fn new(min_chars: usize, max_chars: usize) -> Self {
        Self {
            min_chars,
            max_chars,
        }
    }
}

/// Shape sentences into chunks: split oversized ones first, then merge undersized ones.
pub fn shape(sentences: &[String], limits: ChunkLimits) -> Vec<String> {
    let split = split_long_sentences(sentences, limits.max_chars);
    merge_short_sentences(split, limits.min_chars)
}

/// Split sentences longer than `max_chars` on clause boundaries.
///
/// Clause text and delimiters are packed greedily as separate pieces, so a
/// delimiter that would overflow a chunk opens the next one instead. A
/// sentence without delimiters passes through whole, however long.
pub fn split_long_sentences(sentences: &[String], max_chars: usize) -> Vec<String> {
    let mut result = Vec::with_capacity(sentences.len());

    for sentence in sentences {
        if char_len(sentence) <= max_chars {
            push_trimmed(&mut result, sentence);
            continue;
        }

        let mut current = String::new();
        for piece in clause_pieces(sentence) {
            if !current.is_empty() && char_len(&current) + char_len(piece) > max_chars {
                push_trimmed(&mut result, &current);
                current.clear();
            }
            current.push_str(piece);
        }
        push_trimmed(&mut result, &current);
    }

    result
}

/// Append each sentence to the previous chunk while that chunk is shorter than `min_chars`.
///
/// Only the accumulated chunk's length is checked, so runs of short
/// sentences collapse into one growing chunk.
pub fn merge_short_sentences(sentences: Vec<String>, min_chars: usize) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(sentences.len());

    for sentence in sentences {
        match merged.last_mut() {
            Some(last) if char_len(last) < min_chars => {
                last.push(' ');
                last.push_str(&sentence);
            }
            _ => merged.push(sentence),
        }
    }

    merged
}

/// Cut a sentence into clause text and the delimiters between them.
fn clause_pieces(sentence: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;

    for delimiter in CLAUSE_DELIMITER.find_iter(sentence) {
        if delimiter.start() > start {
            pieces.push(&sentence[start..delimiter.start()]);
        }
        pieces.push(delimiter.as_str());
        start = delimiter.end();
    }
    if start < sentence.len() {
        pieces.push(&sentence[start..]);
    }

    pieces
}

fn push_trimmed(out: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
}

/// Length in characters, not bytes.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
