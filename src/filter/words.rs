//! Normalization and parsing of ignored word lists.
//!
//! Entries and transcript tokens are normalized the same way so that ASR
//! markers like "[noise]" match the token "noise" regardless of how either
//! side was written.

use std::collections::HashSet;

/// Punctuation stripped from both ends of tokens and configured entries.
const STRIP_CHARS: &[char] = &[
    '.', ',', '!', '?', '"', '\'', '(', ')', '[', ']', '<', '>',
];

/// Default filler words (English), murmurs and common ASR background markers.
///
/// Used when no explicit configuration is provided and the configuration
/// environment variable is unset or empty.
pub const DEFAULT_IGNORED_WORDS: &[&str] = &[
    // English fillers
    "uh",
    "umm",
    "hmm",
    "err",
    "ah",
    "like",
    "you know",
    // Murmurs and non-speech sounds
    "mm",
    "mhm",
    "mmm",
    // Common ASR background markers
    "[noise]",
    "[background]",
    "[inaudible]",
    "[laugh]",
    "[cough]",
    "[breath]",
    // Alternative ASR markers
    "<noise>",
    "<silence>",
    "<background>",
];

/// Normalize a token or configured entry for matching.
///
/// Trims surrounding whitespace, strips leading/trailing punctuation and
/// lowercases the result. Strings that consist only of whitespace and
/// punctuation normalize to the empty string.
pub fn normalize(raw: &str) -> String {
    raw.trim_matches(|c: char| c.is_whitespace() || STRIP_CHARS.contains(&c))
        .to_lowercase()
}

/// Parse a delimiter-separated word list into a normalized set.
///
/// Entries that normalize to empty are discarded, so malformed configuration
/// input degrades to fewer entries rather than an error.
pub fn parse_word_list(raw: &str, delimiter: &str) -> HashSet<String> {
    raw.split(delimiter)
        .map(normalize)
        .filter(|w| !w.is_empty())
        .collect()
}

/// Normalize an explicit sequence of words into a set, dropping empties.
pub fn normalize_word_set<I, S>(words: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| normalize(w.as_ref()))
        .filter(|w| !w.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize("  Uh, "), "uh");
        assert_eq!(normalize("UMM"), "umm");
        assert_eq!(normalize("you know"), "you know");
    }

    #[test]
    fn test_normalize_strips_markers() {
        assert_eq!(normalize("[noise]"), "noise");
        assert_eq!(normalize("<silence>"), "silence");
        assert_eq!(normalize("\"hmm!\""), "hmm");
    }

    #[test]
    fn test_normalize_punctuation_only_is_empty() {
        assert_eq!(normalize(",.!?"), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_parse_word_list_discards_empties() {
        let set = parse_word_list("uh, umm ,,, ,UMM", ",");
        assert_eq!(set.len(), 2);
        assert!(set.contains("uh"));
        assert!(set.contains("umm"));
    }

    #[test]
    fn test_parse_word_list_empty_input() {
        assert!(parse_word_list("", ",").is_empty());
        assert!(parse_word_list(" , , ", ",").is_empty());
    }

    #[test]
    fn test_defaults_normalize_cleanly() {
        let set = normalize_word_set(DEFAULT_IGNORED_WORDS.iter().copied());
        assert!(set.contains("uh"));
        assert!(set.contains("you know"));
        // Markers lose their brackets during normalization.
        assert!(set.contains("noise"));
        assert!(set.contains("silence"));
        assert!(!set.contains(""));
    }
}
