//! Transcript filtering logic for the fillergate extension.
//!
//! This module provides the pure decision engine that classifies transcripts
//! as pass-through or suppressed based on the configured ignored word set and
//! the agent's current speaking state.

pub mod engine;
pub mod words;

pub use engine::{FilterDecision, TranscriptFilter, IGNORED_WORDS_ENV};
pub use words::{normalize, parse_word_list, DEFAULT_IGNORED_WORDS};
