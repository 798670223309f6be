//! Handler interception for agent activities.
//!
//! A [`FillerInterceptor`] installs a [`TranscriptFilter`] in front of an
//! activity's transcript handler. Pass-through decisions delegate to the
//! original handler with identical calling convention; suppression withholds
//! the call and emits an `agent_false_interruption` event instead.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use crate::activity::{AgentActivity, HandlerResult, SpeechState, TranscriptHandler};
use crate::clock::{BaseClock, SystemClock};
use crate::events::{ActivityEvent, EventSink};
use crate::filter::{TranscriptFilter, IGNORED_WORDS_ENV};

/// Capability errors raised at attach time. Nothing is installed when attach
/// fails.
#[derive(Debug, Error)]
pub enum AttachError {
    #[error("activity '{0}' has no transcript handler installed")]
    MissingHandler(String),
    #[error("activity '{0}' does not expose a speech state accessor")]
    MissingSpeechState(String),
    #[error("activity '{0}' does not expose an event sink")]
    MissingEventSink(String),
}

/// Association between the interceptor and one attached activity.
struct AttachmentBinding {
    original: TranscriptHandler,
}

/// Installs a shared [`TranscriptFilter`] in front of agent activities.
///
/// One interceptor can be attached to multiple activities; they all share
/// the same word set, and [`set_ignored_words`](Self::set_ignored_words)
/// takes effect for every attached activity immediately.
pub struct FillerInterceptor {
    filter: Arc<TranscriptFilter>,
    clock: Arc<dyn BaseClock>,
    bindings: Mutex<HashMap<u64, AttachmentBinding>>,
}

impl FillerInterceptor {
    /// Create an interceptor around the given filter engine.
    pub fn new(filter: TranscriptFilter) -> Self {
        Self {
            filter: Arc::new(filter),
            clock: Arc::new(SystemClock::new()),
            bindings: Mutex::new(HashMap::new()),
        }
    }

    /// Create an interceptor configured from the `FILLERGATE_IGNORED_WORDS`
    /// environment variable, falling back to the built-in defaults.
    pub fn from_env() -> Self {
        Self::new(TranscriptFilter::from_env(IGNORED_WORDS_ENV))
    }

    /// Replace the clock used to stamp suppression events.
    pub fn with_clock(mut self, clock: Arc<dyn BaseClock>) -> Self {
        self.clock = clock;
        self
    }

    /// The shared filter engine.
    pub fn filter(&self) -> &Arc<TranscriptFilter> {
        &self.filter
    }

    /// Replace the ignored word set for all attached activities.
    pub fn set_ignored_words<I, S>(&self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.filter.configure(words);
    }

    /// Whether this interceptor currently holds a binding for the activity.
    pub fn is_attached(&self, activity: &dyn AgentActivity) -> bool {
        self.bindings.lock().contains_key(&activity.id())
    }

    /// Attach the filter in front of the activity's transcript handler.
    ///
    /// Reads the activity's current handler, speech state accessor and event
    /// sink, stores the original handler, and installs a gating wrapper of
    /// the same calling convention. Attaching to an already-attached
    /// activity is a no-op, never a double-wrap.
    ///
    /// # Errors
    /// Returns an [`AttachError`] when the activity lacks any of the
    /// required capabilities; the activity is left untouched.
    pub fn attach_to_activity(&self, activity: &dyn AgentActivity) -> Result<(), AttachError> {
        let mut bindings = self.bindings.lock();
        if bindings.contains_key(&activity.id()) {
            log::debug!("{}: filter already attached", activity.name());
            return Ok(());
        }

        let original = activity
            .transcript_handler()
            .ok_or_else(|| AttachError::MissingHandler(activity.name().to_string()))?;
        let speech = activity
            .speech_state()
            .ok_or_else(|| AttachError::MissingSpeechState(activity.name().to_string()))?;
        let events = activity
            .event_sink()
            .ok_or_else(|| AttachError::MissingEventSink(activity.name().to_string()))?;

        let gate = Arc::new(FillerGate {
            filter: Arc::clone(&self.filter),
            clock: Arc::clone(&self.clock),
            speech,
            events,
            activity: activity.name().to_string(),
        });

        activity.set_transcript_handler(Some(wrap_handler(original.clone(), gate)));
        bindings.insert(activity.id(), AttachmentBinding { original });
        log::debug!("{}: filler filter attached", activity.name());

        Ok(())
    }

    /// Restore the activity's original transcript handler.
    ///
    /// No-op when the activity has no binding. A transcript event already in
    /// flight through the wrapper completes normally; it holds its own
    /// reference to the original handler.
    pub fn detach_from_activity(&self, activity: &dyn AgentActivity) {
        let mut bindings = self.bindings.lock();
        if let Some(binding) = bindings.remove(&activity.id()) {
            activity.set_transcript_handler(Some(binding.original));
            log::debug!("{}: filler filter detached", activity.name());
        }
    }
}

/// Per-attachment gating state shared by a wrapper with its clones.
struct FillerGate {
    filter: Arc<TranscriptFilter>,
    clock: Arc<dyn BaseClock>,
    speech: Arc<dyn SpeechState>,
    events: Arc<dyn EventSink>,
    activity: String,
}

impl FillerGate {
    /// Query the live speaking state and evaluate the transcript.
    fn should_forward(&self, transcript: &str) -> bool {
        !self
            .filter
            .evaluate(transcript, self.speech.is_speaking())
            .is_suppressed()
    }

    fn report_suppressed(&self, transcript: &str) {
        log::info!(
            "{}: ignored filler-only transcript while agent speaking: {:?}",
            self.activity,
            transcript
        );
        let timestamp = match self.clock.timestamp_ms() {
            Ok(ts) => ts,
            Err(e) => {
                log::debug!("{}: event clock unavailable: {}", self.activity, e);
                0
            }
        };
        self.events
            .emit(ActivityEvent::agent_false_interruption(transcript, timestamp));
    }
}

/// Build the gating wrapper, matching the original's calling convention.
///
/// A blocking original gets a blocking wrapper and a deferred original gets
/// a deferred wrapper, so the replacement is transparent to the activity's
/// dispatch machinery. Errors from the original handler propagate unchanged.
fn wrap_handler(original: TranscriptHandler, gate: Arc<FillerGate>) -> TranscriptHandler {
    match original {
        TranscriptHandler::Blocking(orig) => {
            TranscriptHandler::Blocking(Arc::new(move |transcript: &str| -> HandlerResult<()> {
                if gate.should_forward(transcript) {
                    orig(transcript)
                } else {
                    gate.report_suppressed(transcript);
                    Ok(())
                }
            }))
        }
        TranscriptHandler::Deferred(orig) => {
            TranscriptHandler::Deferred(Arc::new(move |transcript: String| {
                let gate = Arc::clone(&gate);
                let orig = Arc::clone(&orig);
                Box::pin(async move {
                    if gate.should_forward(&transcript) {
                        orig(transcript).await
                    } else {
                        gate.report_suppressed(&transcript);
                        Ok(())
                    }
                })
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::LocalActivity;
    use crate::clock::ClockResult;
    use crate::events::AGENT_FALSE_INTERRUPTION;
    use serde_json::Value;
    use tokio::sync::mpsc;

    #[derive(Debug)]
    struct FixedClock(u64);

    impl BaseClock for FixedClock {
        fn timestamp_ms(&self) -> ClockResult<u64> {
            Ok(self.0)
        }
    }

    type Forwarded = Arc<parking_lot::Mutex<Vec<String>>>;

    fn recording_blocking_handler() -> (TranscriptHandler, Forwarded) {
        let forwarded: Forwarded = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&forwarded);
        let handler = TranscriptHandler::Blocking(Arc::new(move |transcript| {
            sink.lock().push(transcript.to_string());
            Ok(())
        }));
        (handler, forwarded)
    }

    fn recording_deferred_handler() -> (TranscriptHandler, Forwarded) {
        let forwarded: Forwarded = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&forwarded);
        let handler = TranscriptHandler::Deferred(Arc::new(move |transcript: String| {
            let sink = Arc::clone(&sink);
            Box::pin(async move {
                sink.lock().push(transcript);
                Ok(())
            })
        }));
        (handler, forwarded)
    }

    fn attached_activity(
        words: &[&str],
    ) -> (
        Arc<LocalActivity>,
        mpsc::UnboundedReceiver<ActivityEvent>,
        Forwarded,
        FillerInterceptor,
    ) {
        let (activity, events) = LocalActivity::new("test-activity");
        let (handler, forwarded) = recording_blocking_handler();
        activity.set_transcript_handler(Some(handler));

        let interceptor = FillerInterceptor::new(TranscriptFilter::new(words.iter().copied()))
            .with_clock(Arc::new(FixedClock(1_000)));
        interceptor.attach_to_activity(activity.as_ref()).unwrap();

        (activity, events, forwarded, interceptor)
    }

    #[tokio::test]
    async fn test_filler_suppressed_while_speaking() {
        let (activity, mut events, forwarded, _interceptor) = attached_activity(&["uh", "umm"]);
        activity.set_speaking(true);

        activity.dispatch_transcript("Uh,").await.unwrap();

        assert!(forwarded.lock().is_empty());
        let event = events.try_recv().unwrap();
        assert_eq!(event.name, AGENT_FALSE_INTERRUPTION);
        assert_eq!(event.field("transcript"), Some(&Value::from("Uh,")));
        assert_eq!(event.field("timestamp"), Some(&Value::from(1_000)));
    }

    #[tokio::test]
    async fn test_filler_forwarded_while_listening() {
        let (activity, mut events, forwarded, _interceptor) = attached_activity(&["uh", "umm"]);
        activity.set_speaking(false);

        activity.dispatch_transcript("umm").await.unwrap();

        assert_eq!(*forwarded.lock(), vec!["umm"]);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_mixed_transcript_forwarded_while_speaking() {
        let (activity, mut events, forwarded, _interceptor) = attached_activity(&["uh", "umm"]);
        activity.set_speaking(true);

        activity
            .dispatch_transcript("Uh, I think we should")
            .await
            .unwrap();

        assert_eq!(*forwarded.lock(), vec!["Uh, I think we should"]);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_speaking_state_read_fresh_per_event() {
        let (activity, _events, forwarded, _interceptor) = attached_activity(&["uh"]);

        activity.dispatch_transcript("uh").await.unwrap();
        assert_eq!(forwarded.lock().len(), 1);

        // State changed after attach; the wrapper must observe it.
        activity.set_speaking(true);
        activity.dispatch_transcript("uh").await.unwrap();
        assert_eq!(forwarded.lock().len(), 1);

        activity.set_speaking(false);
        activity.dispatch_transcript("uh").await.unwrap();
        assert_eq!(forwarded.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_set_ignored_words_applies_immediately() {
        let (activity, _events, forwarded, interceptor) = attached_activity(&["uh"]);
        activity.set_speaking(true);

        activity.dispatch_transcript("hmm").await.unwrap();
        assert_eq!(forwarded.lock().len(), 1);

        interceptor.set_ignored_words(["hmm"]);
        activity.dispatch_transcript("hmm").await.unwrap();
        assert_eq!(forwarded.lock().len(), 1);

        interceptor.set_ignored_words(std::iter::empty::<&str>());
        activity.dispatch_transcript("hmm").await.unwrap();
        assert_eq!(forwarded.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_attach_is_idempotent() {
        let (activity, mut events, forwarded, interceptor) = attached_activity(&["uh"]);
        interceptor.attach_to_activity(activity.as_ref()).unwrap();
        activity.set_speaking(true);

        activity.dispatch_transcript("uh").await.unwrap();
        assert!(forwarded.lock().is_empty());
        // Exactly one suppression event despite the second attach.
        assert!(events.try_recv().is_ok());
        assert!(events.try_recv().is_err());

        // One detach fully restores the original handler.
        interceptor.detach_from_activity(activity.as_ref());
        activity.dispatch_transcript("uh").await.unwrap();
        assert_eq!(*forwarded.lock(), vec!["uh"]);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_detach_without_binding_is_noop() {
        let (activity, _events) = LocalActivity::new("unbound");
        let (handler, _forwarded) = recording_blocking_handler();
        activity.set_transcript_handler(Some(handler));

        let interceptor = FillerInterceptor::new(TranscriptFilter::with_defaults());
        interceptor.detach_from_activity(activity.as_ref());
        assert!(!interceptor.is_attached(activity.as_ref()));
        assert!(activity.transcript_handler().is_some());
    }

    #[tokio::test]
    async fn test_attach_requires_handler() {
        let (activity, _events) = LocalActivity::new("no-handler");
        let interceptor = FillerInterceptor::new(TranscriptFilter::with_defaults());

        let err = interceptor
            .attach_to_activity(activity.as_ref())
            .unwrap_err();
        assert!(matches!(err, AttachError::MissingHandler(_)));
        // Nothing installed on failure.
        assert!(activity.transcript_handler().is_none());
        assert!(!interceptor.is_attached(activity.as_ref()));
    }

    #[tokio::test]
    async fn test_wrapper_preserves_calling_convention() {
        let (activity, _events) = LocalActivity::new("deferred");
        let (handler, forwarded) = recording_deferred_handler();
        activity.set_transcript_handler(Some(handler));

        let interceptor = FillerInterceptor::new(TranscriptFilter::new(["uh"]));
        interceptor.attach_to_activity(activity.as_ref()).unwrap();

        let installed = activity.transcript_handler().unwrap();
        assert!(!installed.is_blocking());

        activity.set_speaking(true);
        activity.dispatch_transcript("uh").await.unwrap();
        assert!(forwarded.lock().is_empty());

        activity.dispatch_transcript("uh stop").await.unwrap();
        assert_eq!(*forwarded.lock(), vec!["uh stop"]);
    }

    #[tokio::test]
    async fn test_downstream_errors_propagate() {
        let (activity, _events) = LocalActivity::new("failing");
        activity.set_transcript_handler(Some(TranscriptHandler::Blocking(Arc::new(|_| {
            Err("downstream failure".into())
        }))));

        let interceptor = FillerInterceptor::new(TranscriptFilter::new(["uh"]));
        interceptor.attach_to_activity(activity.as_ref()).unwrap();

        let err = activity.dispatch_transcript("real speech").await.unwrap_err();
        assert_eq!(err.to_string(), "downstream failure");
    }

    #[tokio::test]
    async fn test_empty_word_set_never_suppresses() {
        let (activity, mut events, forwarded, _interceptor) = attached_activity(&[]);
        activity.set_speaking(true);

        activity.dispatch_transcript("umm").await.unwrap();
        assert_eq!(*forwarded.lock(), vec!["umm"]);
        assert!(events.try_recv().is_err());
    }
}
