//! Agent activity interface and implementations.
//!
//! The filter does not own the agent runtime; it cooperates with an activity
//! through a narrow contract: a transcript-handler slot, a live speaking
//! state accessor and an event sink. [`LocalActivity`] provides an in-memory
//! implementation for demos and tests.

pub mod base;
pub mod local;

pub use base::{
    AgentActivity, BlockingTranscriptHandler, DeferredTranscriptHandler, HandlerResult,
    SpeechState, TranscriptHandler,
};
pub use local::LocalActivity;
