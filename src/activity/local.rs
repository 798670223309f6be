//! In-memory agent activity for demos and tests.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc;

use crate::activity::base::{AgentActivity, HandlerResult, SpeechState, TranscriptHandler};
use crate::events::{ActivityEvent, EventSink};

/// Minimal in-memory activity: a handler slot, a speaking flag and an event
/// channel. Transcripts enter through [`dispatch_transcript`], which invokes
/// whatever handler is currently installed.
///
/// [`dispatch_transcript`]: LocalActivity::dispatch_transcript
pub struct LocalActivity {
    id: u64,
    name: String,
    handler: RwLock<Option<TranscriptHandler>>,
    speaking: Arc<AtomicBool>,
    events_tx: mpsc::UnboundedSender<ActivityEvent>,
}

impl LocalActivity {
    /// Create a new activity with no handler installed.
    ///
    /// Returns the activity together with the receiving end of its event
    /// channel.
    pub fn new<S: Into<String>>(
        name: S,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<ActivityEvent>) {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let activity = Arc::new(Self {
            id: COUNTER.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            handler: RwLock::new(None),
            speaking: Arc::new(AtomicBool::new(false)),
            events_tx,
        });

        (activity, events_rx)
    }

    /// Update the agent speaking flag.
    pub fn set_speaking(&self, speaking: bool) {
        self.speaking.store(speaking, Ordering::Relaxed);
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::Relaxed)
    }

    /// Deliver a transcript to the currently installed handler.
    ///
    /// The handler reference is cloned out of the slot before invocation, so
    /// a concurrent handler replacement (attach/detach) does not affect a
    /// dispatch that is already in flight. Handler errors propagate to the
    /// caller unchanged. With no handler installed this is a no-op.
    pub async fn dispatch_transcript(&self, transcript: &str) -> HandlerResult<()> {
        let handler = self.handler.read().clone();
        match handler {
            Some(handler) => handler.invoke(transcript).await,
            None => {
                log::debug!("{}: no transcript handler installed, dropping", self.name);
                Ok(())
            }
        }
    }
}

impl AgentActivity for LocalActivity {
    fn id(&self) -> u64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn transcript_handler(&self) -> Option<TranscriptHandler> {
        self.handler.read().clone()
    }

    fn set_transcript_handler(&self, handler: Option<TranscriptHandler>) {
        *self.handler.write() = handler;
    }

    fn speech_state(&self) -> Option<Arc<dyn SpeechState>> {
        Some(Arc::new(LocalSpeechState {
            speaking: Arc::clone(&self.speaking),
        }))
    }

    fn event_sink(&self) -> Option<Arc<dyn EventSink>> {
        Some(Arc::new(LocalEventSink {
            tx: self.events_tx.clone(),
        }))
    }
}

struct LocalSpeechState {
    speaking: Arc<AtomicBool>,
}

impl SpeechState for LocalSpeechState {
    fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::Relaxed)
    }
}

struct LocalEventSink {
    tx: mpsc::UnboundedSender<ActivityEvent>,
}

impl EventSink for LocalEventSink {
    fn emit(&self, event: ActivityEvent) {
        // Receiver may be gone; events are best-effort notifications.
        let _ = self.tx.send(event);
    }
}
