//! Sentence splitting on terminal punctuation.
//!
//! A heuristic, not a grammar: a run of `.`, `!` or `?` followed by
//! whitespace ends a sentence unless the run directly follows one of a
//! fixed list of abbreviations. Anything outside that list (initials,
//! unusual abbreviations) may be mis-split.

use once_cell::sync::Lazy;
use regex::Regex;

/// Tokens whose trailing period does not end a sentence.
pub const ABBREVIATIONS: &[&str] = &["Mr", "Mrs", "Dr", "Ms", "St", "vs", "etc", "Inc", "Ltd"];

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Collapse every whitespace run to a single space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Split text into sentences, keeping the terminal punctuation attached.
///
/// Joining the result with single spaces gives back the
/// whitespace-normalized input.
pub fn split_sentences(text: &str) -> Vec<String> {
    let text = normalize_whitespace(text);
    if text.is_empty() {
        return Vec::new();
    }

    let bytes = text.as_bytes();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if !is_terminal(bytes[i]) {
            i += 1;
            continue;
        }

        let run_end = i + bytes[i..].iter().take_while(|b| is_terminal(**b)).count();
        let followed_by_space = run_end < bytes.len() && bytes[run_end] == b' ';

        if followed_by_space && !follows_abbreviation(&text[..i]) {
            sentences.push(text[start..run_end].to_string());
            // Normalized text has exactly one space here
            start = run_end + 1;
            i = start;
        } else {
            // A guarded run can still end later in the same run ("Dr.. Next")
            i += 1;
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }

    sentences
}

fn is_terminal(b: u8) -> bool {
    matches!(b, b'.' | b'!' | b'?')
}

/// True when `prefix` ends with a listed abbreviation that starts on a word boundary.
fn follows_abbreviation(prefix: &str) -> bool {
    ABBREVIATIONS.iter().any(|abbrev| {
        prefix
            .strip_suffix(abbrev)
            .is_some_and(|before| !before.chars().next_back().is_some_and(is_word_char))
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_split_basic() {
        let sentences = split_sentences("Hello world. How are you? Fine!");
        assert_eq!(sentences, vec!["Hello world.", "How are you?", "Fine!"]);
    }

    #[test]
    fn test_split_empty_and_whitespace() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("  \n\t  ").is_empty());
    }

    #[test]
    fn test_split_keeps_punctuation_runs() {
        let sentences = split_sentences("Really?! Yes... Okay.");
        assert_eq!(sentences, vec!["Really?!", "Yes...", "Okay."]);
    }

    #[test]
    fn test_split_without_trailing_terminator() {
        let sentences = split_sentences("First one. And then the rest");
        assert_eq!(sentences, vec!["First one.", "And then the rest"]);
    }

    #[test]
    fn test_split_normalizes_newlines() {
        let sentences = split_sentences("  Line one\ncontinues.\n\nLine   two.  ");
        assert_eq!(sentences, vec!["Line one continues.", "Line two."]);
    }

    #[test]
    fn test_abbreviations_do_not_split() {
        let sentences =
            split_sentences("Mr. Smith met Dr. Jones on Main St. today. They argued vs. agreed.");
        assert_eq!(
            sentences,
            vec!["Mr. Smith met Dr. Jones on Main St. today.", "They argued vs. agreed."]
        );
    }

    #[test]
    fn test_abbreviation_needs_word_boundary() {
        // "ADr" ends in "Dr" but not on a word boundary
        let sentences = split_sentences("We met ADr. Then left.");
        assert_eq!(sentences, vec!["We met ADr.", "Then left."]);
    }

    #[test]
    fn test_abbreviation_match_is_case_sensitive() {
        let sentences = split_sentences("Call the dr. Now.");
        assert_eq!(sentences, vec!["Call the dr.", "Now."]);
    }

    #[test]
    fn test_guarded_run_splits_later_in_run() {
        let sentences = split_sentences("Ask Dr.. Nobody answers.");
        assert_eq!(sentences, vec!["Ask Dr..", "Nobody answers."]);
    }

    #[test]
    fn test_initials_are_a_known_limitation() {
        let sentences = split_sentences("Written by J. Smith.");
        assert_eq!(sentences, vec!["Written by J.", "Smith."]);
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace(" a \n\n b\tc  "), "a b c");
    }

    proptest! {
        #[test]
        fn prop_split_is_lossless(text in "[A-Za-z .!?,\n]{0,200}") {
            let sentences = split_sentences(&text);
            prop_assert_eq!(sentences.join(" "), normalize_whitespace(&text));
        }

        #[test]
        fn prop_split_never_yields_empty(text in "[A-Za-z .!?\n]{0,200}") {
            for sentence in split_sentences(&text) {
                prop_assert!(!sentence.trim().is_empty());
            }
        }
    }
}
