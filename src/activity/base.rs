//! Base traits and handler types for agent activities.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::events::EventSink;

/// Result type for transcript handler invocations
pub type HandlerResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Handler invoked synchronously on the dispatch path.
pub type BlockingTranscriptHandler = Arc<dyn Fn(&str) -> HandlerResult<()> + Send + Sync>;

/// Handler returning a future that the dispatch path awaits.
pub type DeferredTranscriptHandler = Arc<
    dyn Fn(String) -> Pin<Box<dyn Future<Output = HandlerResult<()>> + Send>> + Send + Sync,
>;

/// A transcript handler together with its declared calling convention.
///
/// The convention is part of the handler's identity: anything wrapping a
/// handler must install a replacement of the same variant so the activity's
/// dispatch machinery observes identical suspension behavior.
#[derive(Clone)]
pub enum TranscriptHandler {
    Blocking(BlockingTranscriptHandler),
    Deferred(DeferredTranscriptHandler),
}

impl TranscriptHandler {
    /// Invoke the handler, awaiting the deferred form.
    ///
    /// Errors raised by the handler propagate unchanged to the caller.
    pub async fn invoke(&self, transcript: &str) -> HandlerResult<()> {
        match self {
            TranscriptHandler::Blocking(handler) => handler(transcript),
            TranscriptHandler::Deferred(handler) => handler(transcript.to_string()).await,
        }
    }

    /// Whether this handler uses the blocking calling convention.
    pub fn is_blocking(&self) -> bool {
        matches!(self, TranscriptHandler::Blocking(_))
    }
}

impl fmt::Debug for TranscriptHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptHandler::Blocking(_) => f.write_str("TranscriptHandler::Blocking"),
            TranscriptHandler::Deferred(_) => f.write_str("TranscriptHandler::Deferred"),
        }
    }
}

/// Live view of the agent's speaking state.
///
/// Queried fresh on every transcript event; implementations must reflect
/// state changes that happen after the handle was obtained.
pub trait SpeechState: Send + Sync {
    fn is_speaking(&self) -> bool;
}

/// Contract an agent activity must expose so a filter can be attached.
///
/// Accessors return `None` when the activity does not support the
/// corresponding capability; attaching then fails with a capability error
/// and nothing is installed.
pub trait AgentActivity: Send + Sync {
    /// Stable identifier for this activity instance.
    fn id(&self) -> u64;

    /// Human-readable name used in logs and errors.
    fn name(&self) -> &str;

    /// The currently installed transcript handler, if any.
    fn transcript_handler(&self) -> Option<TranscriptHandler>;

    /// Replace the transcript handler slot.
    fn set_transcript_handler(&self, handler: Option<TranscriptHandler>);

    /// Handle to the agent's live speaking state.
    fn speech_state(&self) -> Option<Arc<dyn SpeechState>>;

    /// Sink for events emitted towards the activity's session.
    fn event_sink(&self) -> Option<Arc<dyn EventSink>>;
}
