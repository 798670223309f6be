//! Filler word filtering for voice agent transcription pipelines.
//!
//! While an agent is speaking, speech-to-text often emits filler-only
//! transcripts ("uh", "umm", "[noise]") that would falsely interrupt the
//! agent's turn. This crate gates an activity's transcript handler: filler
//! transcripts are suppressed while the agent speaks and surfaced as
//! `agent_false_interruption` events; everything else, and everything while
//! the agent listens, passes through unchanged.

pub mod activity;
pub mod clock;
pub mod events;
pub mod filter;
pub mod interceptor;

pub use activity::{
    AgentActivity, HandlerResult, LocalActivity, SpeechState, TranscriptHandler,
};
pub use clock::{BaseClock, SystemClock};
pub use events::{ActivityEvent, EventSink, AGENT_FALSE_INTERRUPTION};
pub use filter::{FilterDecision, TranscriptFilter, IGNORED_WORDS_ENV};
pub use interceptor::{AttachError, FillerInterceptor};
