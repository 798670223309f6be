//! The transcript filter decision engine.
//!
//! A [`TranscriptFilter`] holds the configured ignored word set and decides,
//! per transcript, whether the transcript should reach the agent's
//! turn-taking logic or be suppressed as a false interruption. The decision
//! is a pure function of the transcript, the agent speaking flag and the
//! current word set; no I/O happens here.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::filter::words::{normalize, normalize_word_set, parse_word_list, DEFAULT_IGNORED_WORDS};

/// Environment variable consumed by [`TranscriptFilter::from_env`].
pub const IGNORED_WORDS_ENV: &str = "FILLERGATE_IGNORED_WORDS";

/// Outcome of evaluating a single transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    /// The transcript carries (or may carry) real content and must be
    /// forwarded to the original handler unchanged.
    PassThrough,
    /// The transcript is composed entirely of configured filler/background
    /// markers while the agent is speaking and must be withheld.
    Suppressed,
}

impl FilterDecision {
    pub fn is_suppressed(&self) -> bool {
        matches!(self, FilterDecision::Suppressed)
    }
}

/// Filter engine holding the ignored word set.
///
/// The word set is replaced as a whole on reconfiguration: readers snapshot
/// the current `Arc` and therefore observe a replacement either fully-before
/// or fully-after, never a partially-updated set. In-flight evaluations keep
/// using the snapshot they already took.
#[derive(Debug)]
pub struct TranscriptFilter {
    ignored: RwLock<Arc<HashSet<String>>>,
}

impl TranscriptFilter {
    /// Create a filter with an explicit word list.
    ///
    /// Each word is normalized (trimmed, punctuation-stripped, lowercased);
    /// entries that normalize to empty are discarded. An empty list means
    /// nothing is filtered.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            ignored: RwLock::new(Arc::new(normalize_word_set(words))),
        }
    }

    /// Create a filter with the built-in default filler words and markers.
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_IGNORED_WORDS.iter().copied())
    }

    /// Create a filter configured from a comma-separated environment variable.
    ///
    /// When the variable is unset or empty the built-in defaults are used,
    /// matching the conventional deployment where no explicit configuration
    /// still yields a useful filter.
    pub fn from_env(var: &str) -> Self {
        match std::env::var(var) {
            Ok(raw) if !raw.trim().is_empty() => Self {
                ignored: RwLock::new(Arc::new(parse_word_list(&raw, ","))),
            },
            _ => Self::with_defaults(),
        }
    }

    /// Replace the entire ignored word set.
    ///
    /// Safe to call concurrently with in-flight [`evaluate`](Self::evaluate)
    /// calls; the replacement is an atomic swap of the underlying set.
    pub fn configure<I, S>(&self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.replace(normalize_word_set(words));
    }

    /// Replace the word set from a delimiter-separated configuration string.
    ///
    /// An empty or all-whitespace `raw` yields an empty set, after which
    /// every transcript passes through.
    pub fn configure_from_source(&self, raw: &str, delimiter: &str) {
        self.replace(parse_word_list(raw, delimiter));
    }

    /// Sorted snapshot of the currently configured entries.
    pub fn ignored_words(&self) -> Vec<String> {
        let mut words: Vec<String> = self.snapshot().iter().cloned().collect();
        words.sort();
        words
    }

    /// Decide whether a transcript passes through or is suppressed.
    ///
    /// While the agent is not speaking the filter is a no-op: real user
    /// speech must never be dropped while the agent is listening. While the
    /// agent is speaking, a transcript is suppressed only when every
    /// meaningful token is in the ignored set, or the whole normalized
    /// transcript equals a configured multi-word phrase. Partial filler
    /// content never suppresses a substantive utterance.
    pub fn evaluate(&self, transcript: &str, agent_speaking: bool) -> FilterDecision {
        if !agent_speaking {
            return FilterDecision::PassThrough;
        }

        let ignored = self.snapshot();
        if ignored.is_empty() {
            return FilterDecision::PassThrough;
        }

        let normalized = normalize(transcript);
        if normalized.is_empty() {
            // Nothing to suppress; downstream logic handles emptiness.
            return FilterDecision::PassThrough;
        }

        // Whole-transcript match covers multi-word phrases like "you know".
        if ignored.contains(&normalized) {
            return FilterDecision::Suppressed;
        }

        let mut matched_any = false;
        for token in normalized.split_whitespace() {
            let token = normalize(token);
            if token.is_empty() {
                // Stray punctuation tokens are ignorable, neither filler
                // nor substantive.
                continue;
            }
            if !ignored.contains(&token) {
                return FilterDecision::PassThrough;
            }
            matched_any = true;
        }

        if matched_any {
            FilterDecision::Suppressed
        } else {
            FilterDecision::PassThrough
        }
    }

    fn snapshot(&self) -> Arc<HashSet<String>> {
        self.ignored.read().clone()
    }

    fn replace(&self, set: HashSet<String>) {
        *self.ignored.write() = Arc::new(set);
    }
}

impl Default for TranscriptFilter {
    fn default() -> Self {
        Self::with_defaults()
    }
}
